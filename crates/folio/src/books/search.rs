use crate::prelude::{println, *};
use colored::Colorize;
use folio_core::books::{transform_search, Book};
use folio_core::pagination::{PageOutcome, PageRequest, PageSize, PageToken, PageView};
use serde::Serialize;

use super::client::{build_client, search_books};
use super::CatalogOptions;

#[derive(Debug, clap::Args, Clone)]
pub struct SearchOptions {
    /// Title to search for
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Page number (1-indexed)
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Books per page: 12, 24, 36 or 48
    #[arg(long, default_value = "24", value_parser = parse_page_size)]
    pub per_page: PageSize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    #[clap(flatten)]
    pub catalog: CatalogOptions,
}

fn parse_page_size(raw: &str) -> std::result::Result<PageSize, String> {
    raw.parse::<usize>()
        .ok()
        .and_then(PageSize::from_value)
        .ok_or_else(|| f!("{raw} is not a page size; use 12, 24, 36 or 48"))
}

/// One page of search results with the query that produced it
#[derive(Debug, Serialize, Clone)]
pub struct SearchOutput {
    pub query: String,
    #[serde(flatten)]
    pub page: PageView<Book>,
}

pub async fn run(options: SearchOptions, global: crate::Global) -> Result<()> {
    let request = PageRequest {
        page: options.page.max(1),
        page_size: options.per_page,
    };

    if global.verbose {
        println!(
            "Searching for \"{}\" (page {}, {} per page)...",
            options.query, request.page, request.page_size
        );
    }

    let output = search_data(&options.query, request, &options.catalog.api_base).await?;

    if options.json {
        println!("{}", format_search_json(&output)?);
    } else {
        print!("{}", format_search_text(&output, request.page_size));
    }

    Ok(())
}

/// Fetch a page of books, following the catalog to its last page when the
/// requested one does not exist
pub async fn search_data(
    query: &str,
    request: PageRequest,
    api_base: &str,
) -> Result<SearchOutput> {
    let query = query.trim();
    if query.is_empty() {
        return Err(eyre!("Search query cannot be empty"));
    }

    let client = build_client()?;
    let page_size = request.page_size.get();
    let mut request = request;

    // A second redirect means the result count moved between calls.
    for _ in 0..2 {
        let response = search_books(&client, api_base, query, &request).await?;
        let result = transform_search(&response, page_size);

        match PageView::build(result, request.page, page_size) {
            PageOutcome::Render(page) => {
                return Ok(SearchOutput {
                    query: query.to_string(),
                    page,
                })
            }
            PageOutcome::Redirect { page } => {
                log::info!(
                    "Page {} is past the last page, showing page {} instead",
                    request.page,
                    page
                );
                request.page = page;
            }
        }
    }

    Err(eyre!(
        "The number of results for \"{}\" changed while paging, try again",
        query
    ))
}

fn format_search_json(output: &SearchOutput) -> Result<String> {
    serde_json::to_string_pretty(output).map_err(|e| eyre!("JSON serialization failed: {}", e))
}

/// Navigation strip with the current page in brackets
fn format_tokens(tokens: &[PageToken], current_page: usize) -> String {
    tokens
        .iter()
        .map(|token| match token.page_number() {
            Some(page) if page == current_page => f!("[{page}]"),
            _ => token.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_search_text(output: &SearchOutput, page_size: PageSize) -> String {
    let page = &output.page;
    let mut result = String::new();

    result.push_str(&f!("\n{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&f!(
        "{}\n",
        f!(
            "OPENLIBRARY RESULTS FOR \"{}\" (Page {} of {})",
            output.query.to_uppercase(),
            page.current_page,
            page.total_pages
        )
        .bright_cyan()
        .bold()
    ));
    result.push_str(&f!("{}\n", "=".repeat(80).bright_cyan()));

    if page.items.is_empty() {
        result.push_str(&f!("\n{}\n", "No books found.".yellow()));
        result.push('\n');
        return result;
    }

    let mut table = new_table();
    table.add_row(prettytable::row!["#", "Title", "Author", "Year", "Cover"]);
    for (idx, book) in page.items.iter().enumerate() {
        let number = page.first_item_number() + idx;
        let cover = book.cover_url().unwrap_or_else(|| "-".to_string());
        table.add_row(prettytable::row![
            number,
            &book.title,
            &book.author,
            &book.year,
            cover
        ]);
    }
    result.push('\n');
    result.push_str(&table.to_string());

    result.push_str(&f!("\n{}\n", "=".repeat(80).bright_yellow()));
    result.push_str(&f!("{}\n", "NAVIGATION".bright_yellow().bold()));
    result.push_str(&f!("{}\n", "=".repeat(80).bright_yellow()));

    result.push_str(&f!(
        "\n{} {} {} {}\n",
        "Pages:".bright_white(),
        format_tokens(&page.page_tokens, page.current_page).bright_cyan(),
        "of".bright_white(),
        f!("{} books", page.total_count).bright_cyan().bold()
    ));

    let command = |target: usize| {
        f!(
            "folio books search \"{}\" --page {} --per-page {}",
            output.query,
            target,
            page_size
        )
    };

    result.push_str(&f!("\n{}:\n", "To navigate".bright_white().bold()));
    if let Some(next) = page.next_page() {
        result.push_str(&f!("  {}: {}\n", "Next page".green(), command(next).cyan()));
    }
    if let Some(previous) = page.previous_page() {
        result.push_str(&f!(
            "  {}: {}\n",
            "Previous page".green(),
            command(previous).cyan()
        ));
    }
    if page.total_pages > 1 && page.current_page != page.total_pages {
        result.push_str(&f!(
            "  {}: {}\n",
            "Last page".green(),
            command(page.total_pages).cyan()
        ));
    }

    result.push_str(&f!(
        "\n{}:\n  {}\n",
        "To change page size".bright_white().bold(),
        "--per-page 12 | 24 | 36 | 48".cyan()
    ));

    result.push('\n');
    result
}
