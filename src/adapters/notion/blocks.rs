//! Markdown to Notion block conversion
//!
//! Handles exactly what the renderer produces: `#`/`##`/`###` headings,
//! `>` quotes (consecutive lines merge into one quote) and paragraphs.
//! Notion caps a rich text item at 2000 characters and a single request at
//! 100 child blocks, so long text is split into several rich text items and
//! block lists are sent in batches.

use serde_json::{json, Map, Value};

/// Maximum characters in one rich text item
pub const MAX_RICH_TEXT_CHARS: usize = 2000;

/// Maximum children per create or append request
pub const MAX_BLOCKS_PER_REQUEST: usize = 100;

/// Converts a Markdown document into Notion blocks
///
/// A leading `# {title}` heading is dropped since the page title already
/// shows it.
pub fn markdown_to_blocks(markdown: &str, title: &str) -> Vec<Value> {
    let mut blocks = Vec::new();
    let mut quote: Vec<&str> = Vec::new();
    let mut seen_content = false;

    for line in markdown.lines() {
        let line = line.trim_end();

        if let Some(text) = line.strip_prefix('>') {
            quote.push(text.strip_prefix(' ').unwrap_or(text));
            continue;
        }
        flush_quote(&mut quote, &mut blocks);

        if line.trim().is_empty() {
            continue;
        }

        if let Some(text) = line.strip_prefix("### ") {
            blocks.push(text_block("heading_3", text));
        } else if let Some(text) = line.strip_prefix("## ") {
            blocks.push(text_block("heading_2", text));
        } else if let Some(text) = line.strip_prefix("# ") {
            if seen_content || text.trim() != title.trim() {
                blocks.push(text_block("heading_1", text));
            }
        } else {
            blocks.push(text_block("paragraph", line));
        }
        seen_content = true;
    }
    flush_quote(&mut quote, &mut blocks);

    blocks
}

fn flush_quote(quote: &mut Vec<&str>, blocks: &mut Vec<Value>) {
    if quote.is_empty() {
        return;
    }
    let text = quote.join("\n");
    quote.clear();
    blocks.push(text_block("quote", &text));
}

fn text_block(kind: &str, text: &str) -> Value {
    let mut block = Map::new();
    block.insert("object".to_string(), json!("block"));
    block.insert("type".to_string(), json!(kind));
    block.insert(kind.to_string(), json!({ "rich_text": rich_text(text) }));
    Value::Object(block)
}

/// Rich text items for `text`, split every [`MAX_RICH_TEXT_CHARS`] characters
pub fn rich_text(text: &str) -> Vec<Value> {
    chunk_chars(text, MAX_RICH_TEXT_CHARS)
        .into_iter()
        .map(|chunk| json!({ "type": "text", "text": { "content": chunk } }))
        .collect()
}

fn chunk_chars(text: &str, max: usize) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }

    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
