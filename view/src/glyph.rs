/// Cosmetic preset for the connector glyphs used by the text renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlyphSet {
    /// `|`, `|-- `, `+-- `
    Ascii,
    /// `│`, `├── `, `└── `
    #[default]
    Box,
    /// `│`, `├── `, `╰── `
    Rounded,
    /// `║`, `╠══ `, `╚══ `
    Double,
    /// `║`, `╟── `, `╙── `
    DoubleVertical,
    /// `│`, `╞══ `, `╘══ `
    DoubleHorizontal,
}

impl GlyphSet {
    /// `(line, branch, corner)`: the vertical continuation glyph, the glyph
    /// for a non-last child and the glyph for the last child.
    pub fn parts(self) -> (&'static str, &'static str, &'static str) {
        match self {
            GlyphSet::Ascii => ("|", "|-- ", "+-- "),
            GlyphSet::Box => ("│", "├── ", "└── "),
            GlyphSet::Rounded => ("│", "├── ", "╰── "),
            GlyphSet::Double => ("║", "╠══ ", "╚══ "),
            GlyphSet::DoubleVertical => ("║", "╟── ", "╙── "),
            GlyphSet::DoubleHorizontal => ("│", "╞══ ", "╘══ "),
        }
    }
}
