use std::fmt;

use snafu::Snafu;

/// Location of a key relative to the namespace root.
///
/// The root itself is the empty path. Segments are displayed joined with
/// [`KeyPath::SEPARATOR`]; both `/` and `\` are accepted when parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    pub const SEPARATOR: char = '/';

    pub fn root() -> Self {
        Self::default()
    }

    pub fn parse(raw: &str) -> Result<Self, InvalidKeyPath> {
        let trimmed = raw.trim_matches(|c| c == '/' || c == '\\');
        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        let mut segments = Vec::new();
        for segment in trimmed.split(['/', '\\']) {
            if validate_key_name(segment).is_err() {
                return Err(InvalidKeyPath {
                    path: raw.to_string(),
                });
            }
            segments.push(segment.to_string());
        }

        Ok(Self { segments })
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    #[cfg(test)]
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Path of the child `name` under this path. `name` must already be a
    /// valid key name.
    pub fn join(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments }
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", Self::SEPARATOR)?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

/// Checks that `name` can stand for a single key below its parent.
pub fn validate_key_name(name: &str) -> Result<(), InvalidKeyName> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0']);
    if valid {
        Ok(())
    } else {
        Err(InvalidKeyName {
            name: name.to_string(),
        })
    }
}

#[derive(Debug, Snafu)]
#[snafu(display("'{}' is not a valid key path", path))]
pub struct InvalidKeyPath {
    path: String,
}

#[derive(Debug, Snafu)]
#[snafu(display("'{}' is not a valid key name", name))]
pub struct InvalidKeyName {
    pub name: String,
}
