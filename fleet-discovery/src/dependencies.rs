//! `dependsOn` extraction from Fleet bundle descriptors.
//!
//! Descriptors are read line by line; no YAML parser is involved. Only the
//! top-level `dependsOn` key is looked at, in any of these shapes:
//!
//! ```yaml
//! dependsOn: ["a", 'b', c]
//!
//! dependsOn:
//!   - a
//!   - "b"
//!   - name: c
//!   - selector:
//!       matchLabels: {app: d}
//!     name: e
//! ```
//!
//! Anything that does not fit these shapes yields no dependencies instead of
//! an error.

const KEY: &str = "dependsOn";

/// Extracts the bundle names listed under `dependsOn`, in source order.
///
/// Returns an empty list when the key is absent, the list is empty, or the
/// value is malformed.
#[must_use]
pub fn extract_depends_on(content: &str) -> Vec<String> {
    let mut lines = content.lines();

    while let Some(line) = lines.next() {
        let Some(value) = key_value(line, KEY) else {
            continue;
        };

        let value = strip_comment(value).trim();
        return if value.is_empty() {
            parse_block_list(lines)
        } else if value.starts_with('[') {
            parse_flow_list(value, lines)
        } else {
            Vec::new()
        };
    }

    Vec::new()
}

/// Returns the text after `key:` if `line` is that key at column zero.
fn key_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(key)?.trim_start_matches([' ', '\t']);
    let value = rest.strip_prefix(':')?;
    (value.is_empty() || value.starts_with([' ', '\t'])).then_some(value)
}

/// Parses `[a, "b", {name: c}]`, reading further lines until the closing bracket.
fn parse_flow_list<'a>(first: &str, mut lines: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut buffer = first.to_string();

    let inner = loop {
        if let Some(end) = closing_bracket(&buffer) {
            break buffer[1..end].to_string();
        }
        match lines.next() {
            // A column-zero key means the list was never closed.
            Some(line)
                if !line.starts_with([' ', '\t', ']']) && !line.trim().is_empty() =>
            {
                return Vec::new();
            }
            Some(line) => {
                buffer.push(' ');
                buffer.push_str(strip_comment(line).trim());
            }
            None => return Vec::new(),
        }
    };

    split_flow(&inner)
        .into_iter()
        .filter_map(|item| {
            let item = item.trim();
            if let Some(mapping) = item.strip_prefix('{') {
                flow_mapping_name(mapping)
            } else {
                non_empty(unquote(item))
            }
        })
        .collect()
}

/// One entry of a block list while it is being read.
struct BlockItem {
    /// Column where the item's mapping keys start, once known.
    content_col: Option<usize>,
    /// Whether a name was already taken from this item.
    named: bool,
}

/// Parses an indented `- item` list until the next top-level key.
fn parse_block_list<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut deps = Vec::new();
    let mut list_indent: Option<usize> = None;
    let mut current: Option<BlockItem> = None;

    for raw in lines {
        let line = strip_comment(raw).trim_end();
        let body = line.trim_start_matches([' ', '\t']);
        if body.is_empty() {
            continue;
        }
        let indent = line.len() - body.len();

        match (list_item(body), list_indent) {
            (Some(_), None) => list_indent = Some(indent),
            (Some(_), Some(expected)) if indent == expected => {}
            (Some(_), Some(expected)) if indent > expected => {
                // Nested list inside an item; not a dependency.
                continue;
            }
            (None, Some(expected)) if indent > expected => {
                continue_item(&mut current, body, indent, &mut deps);
                continue;
            }
            // A new key, a dedent, or a value that is not a list.
            _ => break,
        }

        if let Some(rest) = list_item(body) {
            let content_col = indent + (body.len() - rest.len());
            current = Some(start_item(rest, content_col, &mut deps));
        }
    }

    deps
}

/// Reads the first line of a block list item.
fn start_item(rest: &str, content_col: usize, deps: &mut Vec<String>) -> BlockItem {
    if rest.is_empty() {
        return BlockItem {
            content_col: None,
            named: false,
        };
    }

    if let Some(value) = key_value(rest, "name") {
        let name = non_empty(unquote(value.trim()));
        let named = name.is_some();
        deps.extend(name);
        return BlockItem {
            content_col: Some(content_col),
            named,
        };
    }

    if let Some(mapping) = rest.strip_prefix('{') {
        let name = flow_mapping_name(mapping);
        let named = name.is_some();
        deps.extend(name);
        return BlockItem {
            content_col: None,
            named,
        };
    }

    if is_mapping_entry(rest) {
        // `- selector: ...` with a sibling `name:` on a later line.
        return BlockItem {
            content_col: Some(content_col),
            named: false,
        };
    }

    if !rest.starts_with('[') {
        deps.extend(non_empty(unquote(rest)));
    }
    BlockItem {
        content_col: None,
        named: true,
    }
}

/// Reads an indented line that belongs to the current item.
fn continue_item(current: &mut Option<BlockItem>, body: &str, indent: usize, deps: &mut Vec<String>) {
    let Some(item) = current.as_mut() else {
        return;
    };
    if item.named {
        return;
    }

    let content_col = *item.content_col.get_or_insert(indent);
    if indent != content_col {
        return;
    }

    if let Some(value) = key_value(body, "name") {
        if let Some(name) = non_empty(unquote(value.trim())) {
            deps.push(name);
            item.named = true;
        }
    }
}

/// Returns the text after `- ` if `body` starts a list item.
fn list_item(body: &str) -> Option<&str> {
    let rest = body.strip_prefix('-')?;
    if rest.is_empty() {
        return Some(rest);
    }
    rest.starts_with([' ', '\t'])
        .then(|| rest.trim_start_matches([' ', '\t']))
}

/// Returns true for an unquoted `key: value` or `key:` entry.
fn is_mapping_entry(text: &str) -> bool {
    if text.starts_with(['"', '\'', '[', '{']) {
        return false;
    }
    text.find(':').is_some_and(|pos| {
        let after = &text[pos + 1..];
        after.is_empty() || after.starts_with([' ', '\t'])
    })
}

/// Extracts `name` from the inside of `{...}`.
fn flow_mapping_name(mapping: &str) -> Option<String> {
    let inner = &mapping[..closing_brace(mapping)?];
    split_flow(inner).into_iter().find_map(|entry| {
        let value = key_value(entry.trim(), "name")?;
        non_empty(unquote(value.trim()))
    })
}

/// Finds the `]` that closes a list opened at byte 0.
fn closing_bracket(text: &str) -> Option<usize> {
    find_closing(text, 1, ']')
}

/// Finds the `}` closing a mapping whose `{` was already consumed.
fn closing_brace(text: &str) -> Option<usize> {
    find_closing(text, 0, '}')
}

/// Finds the byte index of the delimiter that brings nesting depth to zero.
fn find_closing(text: &str, skip: usize, close: char) -> Option<usize> {
    let mut depth = 1usize;
    let mut quotes = QuoteState::default();

    for (i, c) in text.char_indices().skip(skip) {
        if quotes.feed(c) {
            continue;
        }
        match c {
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth -= 1;
                if depth == 0 {
                    return (c == close).then_some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits flow content on commas outside quotes and nested brackets.
fn split_flow(inner: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quotes = QuoteState::default();
    let mut start = 0;

    for (i, c) in inner.char_indices() {
        if quotes.feed(c) {
            continue;
        }
        match c {
            '[' | '{' => depth += 1,
            ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&inner[start..]);
    parts
}

/// Removes a trailing `# comment` that is outside quotes.
fn strip_comment(line: &str) -> &str {
    let mut quotes = QuoteState::default();
    let mut previous = ' ';

    for (i, c) in line.char_indices() {
        if !quotes.feed(c) && c == '#' && previous.is_whitespace() {
            return &line[..i];
        }
        previous = c;
    }
    line
}

/// Removes one level of matching single or double quotes.
fn unquote(value: &str) -> String {
    let value = value.trim();
    let bytes = value.as_bytes();
    if bytes.len() >= 2 && bytes[0] == bytes[bytes.len() - 1] {
        let inner = &value[1..value.len() - 1];
        match bytes[0] {
            b'"' => return inner.replace("\\\"", "\""),
            b'\'' => return inner.replace("''", "'"),
            _ => {}
        }
    }
    value.to_string()
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Tracks whether the scanner is inside a quoted scalar.
#[derive(Default)]
struct QuoteState {
    single: bool,
    double: bool,
    escaped: bool,
}

impl QuoteState {
    /// Feeds one character; returns true if it is quoted content or a quote mark.
    fn feed(&mut self, c: char) -> bool {
        if self.double {
            match c {
                _ if self.escaped => self.escaped = false,
                '\\' => self.escaped = true,
                '"' => self.double = false,
                _ => {}
            }
            return true;
        }
        if self.single {
            if c == '\'' {
                self.single = false;
            }
            return true;
        }
        match c {
            '"' => {
                self.double = true;
                true
            }
            '\'' => {
                self.single = true;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deps(content: &str) -> Vec<String> {
        extract_depends_on(content)
    }

    #[test]
    fn equivalent_forms_yield_same_list() {
        let forms = [
            "dependsOn: [\"a\", \"b\"]\n",
            "dependsOn: ['a','b']\n",
            "dependsOn: [a, b]\n",
            "dependsOn:\n  - name: a\n  - name: b\n",
            "dependsOn:\n  - a\n  - b\n",
        ];
        for content in forms {
            assert_eq!(deps(content), ["a", "b"], "{content}");
        }
    }

    #[test]
    fn inline_list_with_surrounding_whitespace() {
        assert_eq!(
            deps("name: my-bundle\ndependsOn: [   bundle1 ,\t'bundle2',  \"bundle3\"  ]\n"),
            ["bundle1", "bundle2", "bundle3"]
        );
    }

    #[test]
    fn stops_at_next_top_level_key() {
        let content = "dependsOn:\n  - a\n  - b\nhelm:\n  chart: x\n  values:\n    - c\n";
        assert_eq!(deps(content), ["a", "b"]);
    }

    #[test]
    fn absent_key_or_empty_list_yields_nothing() {
        assert!(deps("name: my-bundle\nhelm:\n  chart: nginx\n").is_empty());
        assert!(deps("dependsOn: []\n").is_empty());
        assert!(deps("dependsOn: [ ]\n").is_empty());
        assert!(deps("").is_empty());
    }

    #[test]
    fn mixed_block_item_styles() {
        let content = "\
name: my-bundle
dependsOn:
  - plain
  - \"double\"
  - 'single'
  - name: mapped
  - name: \"quoted-mapped\"
  - name: 'single-mapped'
";
        assert_eq!(
            deps(content),
            [
                "plain",
                "double",
                "single",
                "mapped",
                "quoted-mapped",
                "single-mapped"
            ]
        );
    }

    #[test]
    fn name_as_sibling_key() {
        let content = "\
dependsOn:
  - selector:
      matchLabels:
        name: not-this
    name: after-selector
  -
    name: on-next-line
  - {name: flow-mapping, selector: {matchLabels: {app: x}}}
";
        assert_eq!(
            deps(content),
            ["after-selector", "on-next-line", "flow-mapping"]
        );
    }

    #[test]
    fn selector_only_item_is_skipped() {
        let content = "\
dependsOn:
  - selector:
      matchLabels:
        app: db
  - cache
";
        assert_eq!(deps(content), ["cache"]);
    }

    #[test]
    fn block_list_at_key_indentation() {
        let content = "dependsOn:\n- a\n- b\ntargets:\n- clusterName: local\n";
        assert_eq!(deps(content), ["a", "b"]);
    }

    #[test]
    fn ignores_comments_and_blank_lines() {
        let content = "\
dependsOn: # upstream bundles
  # the database first
  - db   # primary

  - 'cache#1' # quoted hash stays
labels:
  tier: backend
";
        assert_eq!(deps(content), ["db", "cache#1"]);
    }

    #[test]
    fn inline_list_spanning_lines() {
        let content = "dependsOn: [\n  apps/nginx,\n  \"apps/redis\"\n]\nhelm:\n  chart: x\n";
        assert_eq!(deps(content), ["apps/nginx", "apps/redis"]);
    }

    #[test]
    fn quoted_commas_are_kept() {
        assert_eq!(deps("dependsOn: [\"a,b\", c]\n"), ["a,b", "c"]);
    }

    #[test]
    fn preserves_source_order() {
        assert_eq!(deps("dependsOn: [zeta, alpha, mid]\n"), ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn only_top_level_key_counts() {
        let content = "helm:\n  dependsOn: [nested]\n";
        assert!(deps(content).is_empty());
    }

    #[test]
    fn malformed_values_yield_nothing() {
        for content in [
            "dependsOn: [a, b\nhelm:\n  chart: x\n",
            "dependsOn: [a, b",
            "dependsOn: single-value\n",
            "dependsOn:\n  key: value\n",
            "dependsOn:\nhelm:\n  chart: x\n",
            "dependsOnSomething: [a]\n",
        ] {
            assert!(deps(content).is_empty(), "{content}");
        }
    }

    #[test]
    fn handles_crlf_line_endings() {
        let content = "name: x\r\ndependsOn:\r\n  - a\r\n  - name: b\r\nhelm:\r\n  chart: y\r\n";
        assert_eq!(deps(content), ["a", "b"]);
    }

    #[test]
    fn first_key_wins() {
        let content = "dependsOn: [first]\ndependsOn: [second]\n";
        assert_eq!(deps(content), ["first"]);
    }
}
