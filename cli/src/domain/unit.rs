//! Minimal systemd unit-file reader.
//!
//! Covers the subset needed to derive service names: `[Section]` headers,
//! `Key=Value` entries, `#`/`;` comments, and backslash line continuations.
//! Anything else is rejected so that broken files are reported instead of
//! silently producing a guessed name.

/// Parsed unit file: ordered `(section, key, value)` entries.
#[derive(Debug, Default, Clone)]
pub struct UnitFile {
    entries: Vec<(String, String, String)>,
}

impl UnitFile {
    /// Parse unit-file text.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason for the first malformed line.
    pub fn parse(content: &str) -> Result<Self, String> {
        let mut entries = Vec::new();
        let mut section: Option<String> = None;
        let mut lines = content.lines().enumerate();

        while let Some((idx, raw)) = lines.next() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                let name = rest
                    .strip_suffix(']')
                    .ok_or_else(|| format!("line {line_no}: unterminated section header"))?;
                if name.is_empty() {
                    return Err(format!("line {line_no}: empty section name"));
                }
                section = Some(name.to_string());
                continue;
            }

            let Some(current) = section.as_ref() else {
                return Err(format!("line {line_no}: key outside of any section"));
            };
            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| format!("line {line_no}: expected Key=Value"))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(format!("line {line_no}: empty key"));
            }

            let mut value = value.trim().to_string();
            while let Some(stripped) = value.strip_suffix('\\') {
                let mut joined = stripped.trim_end().to_string();
                let Some((_, next)) = lines.next() else {
                    value = joined;
                    break;
                };
                joined.push(' ');
                joined.push_str(next.trim());
                value = joined;
            }

            entries.push((current.clone(), key.to_string(), value));
        }

        Ok(Self { entries })
    }

    /// Last value assigned to `key` in `section`, if any.
    #[must_use]
    pub fn lookup(&self, section: &str, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(s, k, _)| s == section && k == key)
            .map(|(_, _, v)| v.as_str())
    }
}
