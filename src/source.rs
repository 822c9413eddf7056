use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Where a page's text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextSource {
    Native,
    Ocr,
}

/// Text of one page, possibly empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub index: usize,
    pub text: String,
    pub source: TextSource,
}

impl PageText {
    pub fn native(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
            source: TextSource::Native,
        }
    }

    pub fn empty(index: usize) -> Self {
        Self::native(index, String::new())
    }
}

/// Supplies page text by index.
///
/// Implementations never fail: when nothing can be recovered for a page
/// they return empty text.
pub trait TextProvider {
    fn page_count(&self) -> usize;

    fn text_for_page(&mut self, index: usize, aggressive_ocr: bool) -> PageText;
}

/// Provider over pre-extracted page strings
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    pages: Vec<String>,
}

impl InMemoryProvider {
    pub fn new<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pages: pages.into_iter().map(Into::into).collect(),
        }
    }
}

impl TextProvider for InMemoryProvider {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn text_for_page(&mut self, index: usize, _aggressive_ocr: bool) -> PageText {
        match self.pages.get(index) {
            Some(text) => PageText::native(index, text.clone()),
            None => PageText::empty(index),
        }
    }
}

/// Caches page text by index so lookahead peeks and later routing of the
/// same page only extract once.
pub struct PageCache<P: TextProvider> {
    provider: P,
    aggressive_ocr: bool,
    cache: HashMap<usize, PageText>,
    ocr_pages: usize,
}

impl<P: TextProvider> PageCache<P> {
    pub fn new(provider: P, aggressive_ocr: bool) -> Self {
        Self {
            provider,
            aggressive_ocr,
            cache: HashMap::new(),
            ocr_pages: 0,
        }
    }

    pub fn page_count(&self) -> usize {
        self.provider.page_count()
    }

    pub fn text(&mut self, index: usize) -> String {
        if let Some(page) = self.cache.get(&index) {
            return page.text.clone();
        }
        let page = self.provider.text_for_page(index, self.aggressive_ocr);
        if page.source == TextSource::Ocr {
            self.ocr_pages += 1;
        }
        debug!(
            "Loaded page {} ({:?}, {} chars)",
            index,
            page.source,
            page.text.len()
        );
        let text = page.text.clone();
        self.cache.insert(index, page);
        text
    }

    /// Drop entries for pages the cursor has moved past
    pub fn evict_before(&mut self, index: usize) {
        self.cache.retain(|&cached, _| cached >= index);
    }

    pub fn ocr_pages(&self) -> usize {
        self.ocr_pages
    }
}
