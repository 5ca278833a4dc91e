//! Chat texts sent back for each command.

use anime_filters_engine::{AddOneResult, BatchAddResult, FilterError, ListResult, Page};

pub const ADD_USAGE: &str = "❌ Please provide an anime name!\nExample: /filters Demon Slayer";
pub const SEARCH_USAGE: &str = "❌ Please provide something to search for!\nExample: /search Naruto";
pub const EMPTY: &str = "📝 No anime in the filter list yet!\nUse /filters <anime_name> to add some.";
pub const INACTIVE: &str = "🚫 Filters are currently stopped.\nAsk an admin to restart them.";
pub const STOPPED: &str = "🚫 Filters have been stopped!\nUsers won't be able to see the anime list until filters are reactivated.";
pub const RESTARTED: &str =
    "✅ Filters have been activated!\nUsers can now see and click on anime names using /list";
pub const STORAGE_UNAVAILABLE: &str =
    "⚠️ The filter list could not be saved right now. Please try again later.";

const COPY_HINT: &str = "📋 Tap and hold any anime name above to copy it!";

pub const WELCOME: &str = "🎌 Welcome to Anime Filters Bot!\n\n\
Commands:\n\
/filters <anime_name> - Add an anime to the filter list\n\
/list - Show all anime in the filter list\n\
/search <text> - Find anime in the filter list\n\
/stop - Stop showing filters\n\
/help - Show this help message";

pub const HELP: &str = "🎌 Anime Filters Bot Help\n\n\
Commands:\n\
• /filters <anime_name> - Add an anime to the filter list (separate several with commas)\n\
• /list - Show all anime names (copyable text)\n\
• /page <n> - Show one page of the list\n\
• /search <text> - Find anime whose name contains the text\n\
• /count - Show how many anime are in the list\n\
• /stop - Stop showing filters\n\
• /restart - Show filters again\n\
• /help - Show this help message\n\n\
Usage:\n\
1. Use \"/filters Jujutsu Kaisen\" to add an anime\n\
2. Use \"/list\" to see all anime names\n\
3. Tap and hold any anime name to copy it";

fn bullets(labels: &[String]) -> String {
    labels
        .iter()
        .map(|label| format!("• {label}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn added(result: &AddOneResult) -> String {
    if result.added {
        format!(
            "✅ Added \"{}\" to the filter list!\nTotal anime: {}",
            result.label, result.current_total
        )
    } else {
        duplicate(&result.label)
    }
}

fn duplicate(label: &str) -> String {
    format!("⚠️ \"{label}\" is already in the filter list!")
}

/// One label reads exactly like a single add; several get a summary.
pub fn batch(result: &BatchAddResult) -> String {
    match (result.added.as_slice(), result.duplicates.as_slice()) {
        ([label], []) => format!(
            "✅ Added \"{label}\" to the filter list!\nTotal anime: {}",
            result.current_total
        ),
        ([], [label]) => duplicate(label),
        (added, duplicates) => {
            let mut text = if added.is_empty() {
                "⚠️ Nothing new was added.".to_string()
            } else {
                format!(
                    "✅ Added {} anime to the filter list!\n{}",
                    result.added_count,
                    bullets(added)
                )
            };
            if !duplicates.is_empty() {
                text.push_str(&format!(
                    "\n\n⚠️ Already in the filter list:\n{}",
                    bullets(duplicates)
                ));
            }
            text.push_str(&format!("\n\nTotal anime: {}", result.current_total));
            text
        }
    }
}

pub fn list(result: &ListResult) -> String {
    format!(
        "🎌 **Anime Filter List ({} total):**\n\n{}\n\n{COPY_HINT}",
        result.count,
        bullets(&result.labels)
    )
}

pub fn page(page: &Page) -> String {
    if page.total_count == 0 {
        return EMPTY.to_string();
    }
    let number = page.page_index.saturating_add(1);
    if page.items.is_empty() {
        return format!(
            "📄 Page {number} is empty. The list has {} page(s).",
            page.total_pages
        );
    }
    format!(
        "🎌 **Anime Filter List ({} total):**\nPage {number} of {}\n\n{}\n\n{COPY_HINT}",
        page.total_count,
        page.total_pages,
        bullets(&page.items)
    )
}

pub fn search(query: &str, matches: &[String]) -> String {
    if matches.is_empty() {
        return format!("🔍 No anime matching \"{query}\" found.");
    }
    format!(
        "🔍 Found {} anime matching \"{query}\":\n\n{}",
        matches.len(),
        bullets(matches)
    )
}

pub fn count(total: usize) -> String {
    format!("📊 Total anime: {total}")
}

pub fn error(err: &FilterError) -> &'static str {
    match err {
        FilterError::EmptyInput => ADD_USAGE,
        FilterError::EmptyQuery => SEARCH_USAGE,
        FilterError::Empty => EMPTY,
        FilterError::Inactive => INACTIVE,
        FilterError::StorageUnavailable(_) => STORAGE_UNAVAILABLE,
    }
}
