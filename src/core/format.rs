/// Story text layout shared by the assembler and anything that displays it.
///
/// A story is a heading, then body paragraphs, then a closing heading, all
/// separated by one blank line:
///
/// ```text
/// # Leo ve Dürüstlük Macerası
///
/// Leo iki yaşındaydı ...
///
/// # SON
/// ```

use serde::Serialize;

pub const PARAGRAPH_SEPARATOR: &str = "\n\n";
pub const TITLE_MARKER: &str = "# ";

/// One displayable piece of a story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Block<'a> {
    /// A marker line, shown without its marker.
    Heading(&'a str),
    Body(&'a str),
}

impl<'a> Block<'a> {
    pub fn text(&self) -> &'a str {
        match self {
            Block::Heading(text) | Block::Body(text) => text,
        }
    }
}

pub fn heading(text: &str) -> String {
    format!("{}{}", TITLE_MARKER, text)
}

/// Lay out a story from its title, body paragraphs and closing line.
pub fn compose<I, S>(title: &str, paragraphs: I, closing: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut story = heading(title);
    for paragraph in paragraphs {
        story.push_str(PARAGRAPH_SEPARATOR);
        story.push_str(paragraph.as_ref());
    }
    story.push_str(PARAGRAPH_SEPARATOR);
    story.push_str(&heading(closing));
    story
}

/// Split a story into blocks on the blank-line separator.
pub fn split_blocks(text: &str) -> Vec<Block<'_>> {
    text.split(PARAGRAPH_SEPARATOR)
        .map(|part| match part.strip_prefix(TITLE_MARKER) {
            Some(title) => Block::Heading(title),
            None => Block::Body(part),
        })
        .collect()
}

/// Body paragraphs only, in order.
pub fn body_paragraphs(text: &str) -> Vec<&str> {
    split_blocks(text)
        .into_iter()
        .filter_map(|block| match block {
            Block::Body(text) => Some(text),
            Block::Heading(_) => None,
        })
        .collect()
}
