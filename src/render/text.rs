//! Plain text rendering for records and page layouts.

use std::fmt::Write;

use crate::model::FrontMatterRecord;
use crate::parser::PageLayout;

/// Render a record as labelled plain text.
pub fn to_text(record: &FrontMatterRecord) -> String {
    let fields = [
        ("File", &record.filename),
        ("Title", &record.title),
        ("Authors", &record.authors),
        ("Affiliations", &record.affiliations),
        ("Keywords", &record.keywords),
        ("Abstract", &record.abstract_text),
    ];

    let mut output = String::new();
    for (label, value) in fields {
        let _ = writeln!(output, "{}: {}", label, value);
    }
    output.trim_end().to_string()
}

/// Render the lines of a layout with their zone labels.
///
/// One line per text line: `y`, font size, zone label (`-` when the line
/// falls outside every zone) and the text.
pub fn layout_to_text(layout: &PageLayout) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "# header cutoff {:.1}, metadata bound {:.1}, authors {}",
        layout.header_cutoff, layout.metadata_bound, layout.author_layout
    );

    for (i, line) in layout.lines.iter().enumerate() {
        let zone = layout.zone_of(i).map_or("-", |k| k.label());
        let _ = writeln!(
            output,
            "{:>7.1} {:>5.1} {:<12} {}",
            line.y, line.max_size, zone, line.text
        );
    }

    for degradation in &layout.degradations {
        let _ = writeln!(output, "# degraded: {}", degradation);
    }

    output.trim_end().to_string()
}
