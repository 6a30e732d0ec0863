//! Zone location: header banner, title, author/affiliation block and the
//! keyword/abstract/body anchors of a first page.

use std::ops::Range;

use crate::model::{join_text, Degradation, Line, Zone, ZoneKind};

use super::authors::AuthorLayout;
use super::heuristics::BannerDetector;
use super::options::ExtractOptions;
use super::patterns::PatternTable;
use super::sections::SectionAnchors;

/// Lines of a page partitioned into zones.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    /// Banner-free lines, top to bottom; zone ranges index into this
    pub lines: Vec<Line>,
    /// Page height in points
    pub page_height: f32,
    /// Lines above this `y` belong to the header
    pub header_cutoff: f32,
    /// Upper bound of the title and author zones
    pub metadata_bound: f32,
    /// Non-empty zones in page order
    pub zones: Vec<Zone>,
    /// Layout of the author zone
    pub author_layout: AuthorLayout,
    /// Stages that fell back to defaults
    pub degradations: Vec<Degradation>,
}

impl PageLayout {
    /// The zone of the given kind, if present.
    pub fn zone(&self, kind: ZoneKind) -> Option<&Zone> {
        self.zones.iter().find(|z| z.kind() == kind)
    }

    /// Lines of the zone of the given kind; empty when absent.
    pub fn zone_lines(&self, kind: ZoneKind) -> &[Line] {
        self.zone(kind)
            .map(|z| &self.lines[z.lines()])
            .unwrap_or(&[])
    }

    /// Zone covering the line at `index`, if any.
    pub fn zone_of(&self, index: usize) -> Option<ZoneKind> {
        self.zones
            .iter()
            .find(|z| z.lines().contains(&index))
            .map(Zone::kind)
    }

    /// Title text: lines of the title range at or above its size floor.
    pub fn title_text(&self) -> String {
        match self.zone(ZoneKind::Title) {
            Some(Zone::Title { lines, min_size }) => {
                let selected: Vec<Line> = self.lines[lines.clone()]
                    .iter()
                    .filter(|l| l.max_size >= *min_size)
                    .cloned()
                    .collect();
                join_text(&selected)
            }
            _ => String::new(),
        }
    }

    fn degrade(&mut self, degradation: Degradation) {
        log::debug!("layout degraded: {}", degradation);
        self.degradations.push(degradation);
    }
}

/// Partitions page lines into typed zones.
#[derive(Debug)]
pub struct ZoneLocator<'a> {
    options: &'a ExtractOptions,
    patterns: &'a PatternTable,
    banner: BannerDetector<'a>,
}

impl<'a> ZoneLocator<'a> {
    /// Create a locator.
    pub fn new(options: &'a ExtractOptions, patterns: &'a PatternTable) -> Self {
        Self {
            options,
            patterns,
            banner: BannerDetector::new(patterns, &options.journal_names),
        }
    }

    /// Check whether a line is banner boilerplate.
    pub fn is_banner(&self, text: &str) -> bool {
        self.banner.is_banner(text)
    }

    /// Locate zones on a page of lines sorted by `y`.
    pub fn locate(&self, lines: Vec<Line>, page_height: f32) -> PageLayout {
        let mut layout = PageLayout {
            lines: Vec::with_capacity(lines.len()),
            page_height,
            header_cutoff: 0.0,
            metadata_bound: 0.0,
            zones: Vec::new(),
            author_layout: AuthorLayout::default(),
            degradations: Vec::new(),
        };

        // Header cutoff from banners in the top band, then drop every banner.
        let band = page_height * self.options.header_band;
        let mut lowest_banner: Option<f32> = None;
        for line in lines {
            if self.banner.is_banner(&line.text) {
                if line.y <= band {
                    lowest_banner = Some(lowest_banner.map_or(line.y, |y| y.max(line.y)));
                }
                continue;
            }
            layout.lines.push(line);
        }

        layout.header_cutoff = match lowest_banner {
            Some(y) => y + self.options.header_margin,
            None => {
                layout.degrade(Degradation::HeaderCutoffDefaulted);
                page_height * self.options.default_header_fraction
            }
        };
        let bound = self.metadata_bound(&mut layout);
        layout.metadata_bound = bound;

        log::debug!(
            "header cutoff {:.1}, metadata bound {:.1} ({} lines)",
            layout.header_cutoff,
            layout.metadata_bound,
            layout.lines.len()
        );

        let header_end = layout.lines.partition_point(|l| l.y < layout.header_cutoff);
        push_zone(&mut layout.zones, Zone::Header { lines: 0..header_end });

        let title = self.locate_title(&layout);
        let (after_title, title_bottom) = match &title {
            Some((zone, bottom)) => (zone.lines().end, *bottom),
            None => (header_end, layout.header_cutoff),
        };
        match title {
            Some((zone, _)) => push_zone(&mut layout.zones, zone),
            None => layout.degrade(Degradation::TitleNotFound),
        }

        let authors_end = self.locate_authors(&mut layout, title_bottom);
        let sections_from = after_title.max(authors_end);
        self.locate_sections(&mut layout, sections_from);

        layout
    }

    fn metadata_bound(&self, layout: &mut PageLayout) -> f32 {
        let anchor = layout
            .lines
            .iter()
            .find(|l| self.patterns.is_article_info(&l.text))
            .or_else(|| {
                layout
                    .lines
                    .iter()
                    .find(|l| self.patterns.is_abstract_header(&l.text))
            })
            .map(|l| l.y);

        match anchor {
            Some(y) => y,
            None => {
                layout.degrade(Degradation::MetadataBoundDefaulted);
                layout.page_height * self.options.default_metadata_fraction
            }
        }
    }

    /// Title zone plus the `y` of its last line.
    fn locate_title(&self, layout: &PageLayout) -> Option<(Zone, f32)> {
        let limit = layout
            .metadata_bound
            .min(layout.page_height * self.options.title_search_fraction);
        let candidates: Vec<usize> = (0..layout.lines.len())
            .filter(|&i| {
                let y = layout.lines[i].y;
                y >= layout.header_cutoff && y < limit
            })
            .collect();

        let max_size = candidates
            .iter()
            .map(|&i| layout.lines[i].max_size)
            .fold(None, |acc: Option<f32>, s| Some(acc.map_or(s, |a| a.max(s))))?;
        let min_size = max_size - self.options.title_size_slack;

        let mut selected = candidates
            .into_iter()
            .filter(|&i| layout.lines[i].max_size >= min_size);
        let first = selected.next()?;
        let mut last = first;
        for i in selected {
            if layout.lines[i].y - layout.lines[last].y > self.options.title_line_gap {
                break;
            }
            last = i;
        }

        let zone = Zone::Title {
            lines: first..last + 1,
            min_size,
        };
        let bottom = layout.lines[last].y;
        Some((zone, bottom))
    }

    /// Author and affiliation zones; returns the end of the zone.
    fn locate_authors(&self, layout: &mut PageLayout, title_bottom: f32) -> usize {
        let lower = title_bottom + self.options.author_zone_gap;
        let zone = range_where(&layout.lines, |l| l.y > lower && l.y < layout.metadata_bound);
        if zone.is_empty() {
            return zone.end;
        }

        let zone_lines = &layout.lines[zone.clone()];
        let (author_layout, split) = AuthorLayout::classify(zone_lines, self.patterns);

        let (authors, affiliations) = match split {
            Some(split) => {
                let stop = zone_lines[split..]
                    .iter()
                    .position(|l| self.patterns.is_stop_line(&l.text))
                    .map_or(zone_lines.len(), |p| split + p);
                (zone.start..zone.start + split, zone.start + split..zone.start + stop)
            }
            None => {
                let split = self.options.default_author_lines.min(zone.len());
                layout.degrade(Degradation::AuthorSplitDefaulted);
                (zone.start..zone.start + split, zone.start + split..zone.end)
            }
        };

        log::debug!(
            "author zone {:?} ({}), affiliations {:?}",
            authors,
            author_layout,
            affiliations
        );

        layout.author_layout = author_layout;
        push_zone(&mut layout.zones, Zone::Authors { lines: authors });
        push_zone(&mut layout.zones, Zone::Affiliations { lines: affiliations.clone() });
        affiliations.end
    }

    fn locate_sections(&self, layout: &mut PageLayout, from: usize) {
        let anchors = SectionAnchors::locate(&layout.lines, from, self.patterns);
        log::debug!(
            "anchors from line {}: keywords {:?}, abstract {:?}, introduction {:?}",
            from,
            anchors.keywords,
            anchors.abstract_header,
            anchors.introduction
        );

        let keywords = anchors.keywords_span(&layout.lines, self.patterns);
        let abstract_span = anchors.abstract_span(&layout.lines, self.patterns);
        let sections_end = keywords
            .iter()
            .chain(abstract_span.iter())
            .map(|r| r.end)
            .max()
            .unwrap_or(from);

        if let Some(lines) = keywords {
            push_zone(&mut layout.zones, Zone::Keywords { lines });
        }
        if let Some(lines) = abstract_span {
            push_zone(&mut layout.zones, Zone::Abstract { lines });
        }
        if let Some(intro) = anchors.introduction {
            let start = intro.max(sections_end);
            push_zone(&mut layout.zones, Zone::Body { lines: start..layout.lines.len() });
        }

        layout.zones.sort_by_key(|z| z.lines().start);
    }
}

fn push_zone(zones: &mut Vec<Zone>, zone: Zone) {
    if !zone.is_empty() {
        zones.push(zone);
    }
}

/// Contiguous range of lines satisfying `pred`, assuming `lines` is sorted
/// so that the matching lines form one run.
fn range_where(lines: &[Line], pred: impl Fn(&Line) -> bool) -> Range<usize> {
    match lines.iter().position(&pred) {
        Some(start) => {
            let len = lines[start..].iter().take_while(|l| pred(*l)).count();
            start..start + len
        }
        None => 0..0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(y: f32, text: &str, size: f32) -> Line {
        Line::new(y, text, size)
    }

    fn marked_page() -> Vec<Line> {
        vec![
            line(40.0, "Journal of Computational Science 45 (2020) 101234", 8.0),
            line(52.0, "Contents lists available at ScienceDirect", 8.0),
            line(120.0, "Layout-based recovery of", 17.0),
            line(138.0, "paper front matter", 17.0),
            line(170.0, "Jane Doe a,∗, John Smith b", 11.0),
            line(190.0, "a Department of Physics, University of Oslo, Norway", 8.0),
            line(200.0, "b MIT, Cambridge, USA", 8.0),
            line(240.0, "ARTICLE INFO ABSTRACT", 9.0),
            line(252.0, "Keywords: layout, PDF", 9.0),
            line(264.0, "Abstract", 9.0),
            line(276.0, "We recover front matter.", 9.0),
            line(400.0, "1. Introduction", 10.0),
            line(412.0, "Papers are hard.", 10.0),
        ]
    }

    fn locate(lines: Vec<Line>) -> PageLayout {
        let options = ExtractOptions::default();
        ZoneLocator::new(&options, PatternTable::shared()).locate(lines, 792.0)
    }

    #[test]
    fn test_banners_removed_and_cutoff() {
        let layout = locate(marked_page());
        assert_eq!(layout.header_cutoff, 57.0);
        assert_eq!(layout.metadata_bound, 240.0);
        assert!(layout.lines.iter().all(|l| !l.text.contains("ScienceDirect")));
        assert!(layout.degradations.is_empty());
    }

    #[test]
    fn test_title_and_authors() {
        let layout = locate(marked_page());
        assert_eq!(layout.title_text(), "Layout-based recovery of paper front matter");
        assert_eq!(layout.author_layout, AuthorLayout::Marked);
        assert_eq!(layout.zone_lines(ZoneKind::Authors).len(), 1);
        assert_eq!(layout.zone_lines(ZoneKind::Affiliations).len(), 2);
    }

    #[test]
    fn test_sections_and_body() {
        let layout = locate(marked_page());
        let keywords = layout.zone_lines(ZoneKind::Keywords);
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords[0].text, "Keywords: layout, PDF");
        assert_eq!(layout.zone_lines(ZoneKind::Abstract).len(), 2);
        assert_eq!(layout.zone_lines(ZoneKind::Body)[0].text, "1. Introduction");
    }

    #[test]
    fn test_zones_do_not_overlap() {
        let layout = locate(marked_page());
        for (i, a) in layout.zones.iter().enumerate() {
            for b in &layout.zones[i + 1..] {
                assert!(!a.overlaps(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_defaults_without_anchors() {
        let layout = locate(vec![
            line(100.0, "A Title", 16.0),
            line(130.0, "Jane Doe", 10.0),
            line(142.0, "John Smith", 10.0),
            line(154.0, "Someone Else", 10.0),
        ]);

        assert!((layout.header_cutoff - 79.2).abs() < 1e-3);
        assert!(layout.degradations.contains(&Degradation::HeaderCutoffDefaulted));
        assert!(layout.degradations.contains(&Degradation::MetadataBoundDefaulted));
        assert!(layout.degradations.contains(&Degradation::AuthorSplitDefaulted));
        assert_eq!(layout.zone_lines(ZoneKind::Authors).len(), 2);
        assert_eq!(layout.zone_lines(ZoneKind::Affiliations).len(), 1);
    }

    #[test]
    fn test_title_stops_at_gap() {
        let layout = locate(vec![
            line(100.0, "Main title", 18.0),
            line(160.0, "Stray large fragment", 18.0),
        ]);
        assert_eq!(layout.title_text(), "Main title");
    }

    #[test]
    fn test_empty_page() {
        let layout = locate(Vec::new());
        assert!(layout.zones.is_empty());
        assert!(layout.degradations.contains(&Degradation::TitleNotFound));
        assert_eq!(layout.title_text(), "");
    }
}
