use super::styled::StyledText;

/// A multi-page book presented to one player.
#[derive(Debug, Clone, Default)]
pub struct BookView {
    pub title: String,
    pub author: String,
    pub pages: Vec<StyledText>,
}

impl BookView {
    pub fn builder() -> BookViewBuilder {
        BookViewBuilder::default()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, index: usize) -> Option<&StyledText> {
        self.pages.get(index)
    }

    /// Plain text of every page, in order
    pub fn plain_pages(&self) -> Vec<String> {
        self.pages.iter().map(StyledText::to_plain).collect()
    }
}

#[derive(Debug, Default)]
pub struct BookViewBuilder {
    book: BookView,
}

impl BookViewBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.book.title = title.into();
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.book.author = author.into();
        self
    }

    pub fn add_page(mut self, page: StyledText) -> Self {
        self.book.pages.push(page);
        self
    }

    pub fn build(self) -> BookView {
        self.book
    }
}
