//! Page number arithmetic and navigation tokens
//!
//! Pure functions that turn a result count, a requested page and a page size
//! into a render-ready [`PageView`]: the clamped current page, the total page
//! count, the items of that page and a bounded strip of [`PageToken`]s for the
//! navigation controls.
//!
//! Nothing in here rejects input. Missing or malformed values fall back to
//! defaults and out-of-range pages are corrected. The only signal a caller has
//! to act on is [`PageOutcome::Redirect`], returned when the requested page
//! lies past the last one.

use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Range;

/// Default number of navigation buttons before the token strip is truncated
pub const MAX_BUTTONS: usize = 7;

/// Marker rendered in place of skipped page numbers
pub const ELLIPSIS: &str = "…";

/// Page sizes a client may ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(into = "usize")]
pub enum PageSize {
    Twelve,
    #[default]
    TwentyFour,
    ThirtySix,
    FortyEight,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [
        PageSize::Twelve,
        PageSize::TwentyFour,
        PageSize::ThirtySix,
        PageSize::FortyEight,
    ];

    pub fn get(self) -> usize {
        match self {
            PageSize::Twelve => 12,
            PageSize::TwentyFour => 24,
            PageSize::ThirtySix => 36,
            PageSize::FortyEight => 48,
        }
    }

    /// Look up an allowed page size by its numeric value
    pub fn from_value(value: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.get() == value)
    }

    /// Parse a raw query value, falling back to the default for anything
    /// missing, non-numeric or outside the allow-list
    pub fn from_raw(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.trim().parse::<usize>().ok())
            .and_then(Self::from_value)
            .unwrap_or_default()
    }
}

impl From<PageSize> for usize {
    fn from(size: PageSize) -> Self {
        size.get()
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Normalized client request for one page of results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: PageSize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: PageSize::default(),
        }
    }
}

impl PageRequest {
    /// Build a request from raw `page` and `perPage` query values
    ///
    /// A page that is missing or not an integer becomes 1; zero and negative
    /// pages are raised to 1.
    pub fn from_raw(page: Option<&str>, page_size: Option<&str>) -> Self {
        Self {
            page: parse_page(page),
            page_size: PageSize::from_raw(page_size),
        }
    }
}

/// Parse a raw page number, never returning less than 1
pub fn parse_page(raw: Option<&str>) -> usize {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .map(|page| usize::try_from(page.max(1)).unwrap_or(usize::MAX))
        .unwrap_or(1)
}

/// Total number of items and the items available for the current fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet<T> {
    pub total_count: usize,
    pub items: Vec<T>,
}

impl<T> ResultSet<T> {
    pub fn empty() -> Self {
        Self {
            total_count: 0,
            items: Vec::new(),
        }
    }
}

/// Either a page number or a gap in the navigation strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    Page(usize),
    Ellipsis,
}

impl PageToken {
    pub fn page_number(self) -> Option<usize> {
        match self {
            PageToken::Page(page) => Some(page),
            PageToken::Ellipsis => None,
        }
    }
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageToken::Page(page) => write!(f, "{page}"),
            PageToken::Ellipsis => f.write_str(ELLIPSIS),
        }
    }
}

// Numbers stay numbers and gaps become the ellipsis string, so JSON consumers
// get `[1, "…", 4, 5, 6, "…", 10]`.
impl Serialize for PageToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageToken::Page(page) => serializer.serialize_u64(*page as u64),
            PageToken::Ellipsis => serializer.serialize_str(ELLIPSIS),
        }
    }
}

/// Result of checking a requested page against the page count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageClamp {
    /// The page to render
    Current(usize),
    /// The request points past the end; the caller should send the client to
    /// `last_page` instead of rendering
    Redirect { last_page: usize },
}

/// Number of pages needed to hold `total_count` items
///
/// Zero items (or a zero page size) means zero pages.
pub fn total_pages(total_count: usize, page_size: usize) -> usize {
    if total_count == 0 || page_size == 0 {
        return 0;
    }

    total_count.div_ceil(page_size)
}

/// Check a requested page against the total page count
pub fn clamp_page(requested_page: usize, total_pages: usize) -> PageClamp {
    if total_pages == 0 {
        return PageClamp::Current(1);
    }

    match requested_page {
        0 => PageClamp::Current(1),
        page if page > total_pages => PageClamp::Redirect {
            last_page: total_pages,
        },
        page => PageClamp::Current(page),
    }
}

/// First `page_size` items of a batch fetched from upstream
pub fn slice_items<T>(items: &[T], page_size: usize) -> &[T] {
    &items[..items.len().min(page_size)]
}

/// Index range of `page` within a locally held list of `total_count` items
///
/// The range is always within `0..total_count`; pages past the end yield an
/// empty range at the end of the list.
pub fn page_bounds(total_count: usize, page: usize, page_size: usize) -> Range<usize> {
    let start = page
        .saturating_sub(1)
        .saturating_mul(page_size)
        .min(total_count);
    let end = start.saturating_add(page_size).min(total_count);

    start..end
}

/// Build the navigation strip for `current_page` out of `total_pages`
///
/// Up to `max_buttons` pages are listed verbatim. Beyond that the first and
/// last pages are always present, with a three page window around the current
/// page clamped to `2..=total_pages - 1` and ellipses over the gaps.
///
/// `current_page` is expected to be within `1..=total_pages`.
pub fn build_page_tokens(
    current_page: usize,
    total_pages: usize,
    max_buttons: usize,
) -> Vec<PageToken> {
    if total_pages <= max_buttons.max(2) {
        return (1..=total_pages).map(PageToken::Page).collect();
    }

    let show_left = current_page.saturating_sub(1).max(2);
    let show_right = current_page.saturating_add(1).min(total_pages - 1);

    let mut tokens = Vec::with_capacity(max_buttons);
    tokens.push(PageToken::Page(1));
    if show_left > 2 {
        tokens.push(PageToken::Ellipsis);
    }
    tokens.extend((show_left..=show_right).map(PageToken::Page));
    if show_right < total_pages - 1 {
        tokens.push(PageToken::Ellipsis);
    }
    tokens.push(PageToken::Page(total_pages));

    tokens
}

/// Render-ready page of results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView<T> {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_count: usize,
    pub page_size: usize,
    pub items: Vec<T>,
    pub page_tokens: Vec<PageToken>,
}

/// What a caller should do with a page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome<T> {
    Render(PageView<T>),
    /// Send the client to `page`, the last page that exists
    Redirect { page: usize },
}

impl<T> PageView<T> {
    /// Build a page from a result set whose items are a single upstream
    /// batch, keeping at most `page_size` of them
    pub fn build(result: ResultSet<T>, requested_page: usize, page_size: usize) -> PageOutcome<T> {
        let total_pages = total_pages(result.total_count, page_size);

        let current_page = match clamp_page(requested_page, total_pages) {
            PageClamp::Current(page) => page,
            PageClamp::Redirect { last_page } => return PageOutcome::Redirect { page: last_page },
        };

        let mut items = result.items;
        items.truncate(page_size);

        PageOutcome::Render(Self::assemble(
            current_page,
            total_pages,
            result.total_count,
            page_size,
            items,
        ))
    }

    /// Build a page out of a complete, locally held list
    pub fn build_local(items: Vec<T>, requested_page: usize, page_size: usize) -> PageOutcome<T> {
        let total_count = items.len();
        let total_pages = total_pages(total_count, page_size);

        let current_page = match clamp_page(requested_page, total_pages) {
            PageClamp::Current(page) => page,
            PageClamp::Redirect { last_page } => return PageOutcome::Redirect { page: last_page },
        };

        let bounds = page_bounds(total_count, current_page, page_size);
        let items = items
            .into_iter()
            .skip(bounds.start)
            .take(bounds.len())
            .collect();

        PageOutcome::Render(Self::assemble(
            current_page,
            total_pages,
            total_count,
            page_size,
            items,
        ))
    }

    /// A page with nothing on it
    pub fn empty(page_size: usize) -> Self {
        Self::assemble(1, 0, 0, page_size, Vec::new())
    }

    fn assemble(
        current_page: usize,
        total_pages: usize,
        total_count: usize,
        page_size: usize,
        items: Vec<T>,
    ) -> Self {
        Self {
            current_page,
            total_pages,
            total_count,
            page_size,
            items,
            page_tokens: build_page_tokens(current_page, total_pages, MAX_BUTTONS),
        }
    }

    pub fn previous_page(&self) -> Option<usize> {
        (self.current_page > 1).then(|| self.current_page - 1)
    }

    pub fn next_page(&self) -> Option<usize> {
        (self.current_page < self.total_pages).then(|| self.current_page + 1)
    }

    /// 1-based position of the first item on this page
    pub fn first_item_number(&self) -> usize {
        (self.current_page - 1) * self.page_size + 1
    }
}
