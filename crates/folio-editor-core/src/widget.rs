//! Widget catalog: pure render descriptors substituted for hidden or
//! replaced raw text.
//!
//! Widgets hold no reference into the buffer. They are constructed fresh on
//! every decoration pass and compared by value so a renderer can skip
//! re-painting a widget whose parameters are unchanged.

use smol_str::SmolStr;

/// A render target for a `Replace` decoration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    /// Renders nothing; the zero-footprint target a renderer materializes
    /// `Hide` decorations with while the text stays in the buffer.
    Hidden,
    /// One glyph standing in for a list marker, whatever its literal text.
    Bullet,
    /// A single visual divider element.
    HorizontalRule,
    /// An inline image.
    Image(ImageWidget),
    /// A rendered table block.
    Table(TableWidget),
}

/// Image render descriptor.
///
/// Resolution of non-remote, non-data-URI paths is the asset bridge's
/// problem; this carries the url/alt pair verbatim from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageWidget {
    pub url: SmolStr,
    pub alt: SmolStr,
}

/// Parse the canonical markdown image form `![alt](url)`.
///
/// Matches non-greedily: alt ends at the first `](` after `![`, url at the
/// first `)` after that. Returns None for anything malformed - malformed
/// image syntax is left raw, never hidden.
pub fn parse_image(raw: &str) -> Option<ImageWidget> {
    let bang = raw.find("![")?;
    let rest = &raw[bang + 2..];
    let close = rest.find("](")?;
    let alt = &rest[..close];
    let after = &rest[close + 2..];
    let paren = after.find(')')?;
    let url = &after[..paren];
    Some(ImageWidget {
        url: SmolStr::new(url),
        alt: SmolStr::new(alt),
    })
}

/// Table render descriptor, built from the raw source slice of the block.
///
/// Equality is on the raw content, so an unchanged table skips re-render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableWidget {
    pub raw: SmolStr,
}

/// The shape a `TableWidget` renders to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableLayout {
    /// Source had fewer than 2 non-blank lines; render a fixed
    /// "invalid table" placeholder instead. Non-fatal.
    Placeholder,
    /// Header cells and body rows. Cell counts are not reconciled between
    /// header and body.
    Grid {
        header: Vec<SmolStr>,
        rows: Vec<Vec<SmolStr>>,
    },
}

impl TableWidget {
    pub fn new(raw: impl Into<SmolStr>) -> Self {
        Self { raw: raw.into() }
    }

    /// Parse the raw block into a renderable layout.
    ///
    /// Line 0 is the header, line 1 the header/body separator (always
    /// skipped), lines 2.. the body. Blank lines are discarded before
    /// indexing.
    pub fn layout(&self) -> TableLayout {
        let lines: Vec<&str> = self
            .raw
            .split('\n')
            .filter(|l| !l.trim().is_empty())
            .collect();

        if lines.len() < 2 {
            return TableLayout::Placeholder;
        }

        let header = normalize_row(lines[0]);
        let rows = lines[2..].iter().map(|l| normalize_row(l)).collect();

        TableLayout::Grid { header, rows }
    }
}

/// Split a table line on `|`, trim each cell, and strip the empty leading
/// cell from a leading pipe and the empty trailing cell from a trailing
/// pipe. Interior empty cells are real cells and are preserved.
fn normalize_row(line: &str) -> Vec<SmolStr> {
    let cells: Vec<&str> = line.split('|').map(str::trim).collect();
    let last = cells.len().saturating_sub(1);

    cells
        .into_iter()
        .enumerate()
        .filter(|(i, c)| !((*i == 0 || *i == last) && c.is_empty()))
        .map(|(_, c)| SmolStr::new(c))
        .collect()
}
