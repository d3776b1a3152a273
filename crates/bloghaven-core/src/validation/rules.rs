//! Per-field rules.

/// A rule chain over one field value. The first failing rule wins.
///
/// ```
/// use bloghaven_core::validation::Field;
///
/// let check = Field::new("a").required().length(2, 20);
/// assert_eq!(
///     check.into_error().as_deref(),
///     Some("Field must be between 2 and 20 characters long.")
/// );
/// ```
#[derive(Debug)]
pub struct Field<'a> {
    value: &'a str,
    error: Option<String>,
}

impl<'a> Field<'a> {
    pub fn new(value: &'a str) -> Self {
        Self { value, error: None }
    }

    fn check(mut self, ok: impl FnOnce(&str) -> bool, message: impl FnOnce() -> String) -> Self {
        if self.error.is_none() && !ok(self.value) {
            self.error = Some(message());
        }
        self
    }

    pub fn required(self) -> Self {
        self.check(
            |v| !v.trim().is_empty(),
            || "This field is required.".to_string(),
        )
    }

    /// Length bounds, counted in characters.
    pub fn length(self, min: usize, max: usize) -> Self {
        self.check(
            |v| (min..=max).contains(&v.chars().count()),
            || format!("Field must be between {min} and {max} characters long."),
        )
    }

    pub fn email(self) -> Self {
        self.check(is_email, || "Invalid email address.".to_string())
    }

    pub fn equal_to(self, other_value: &str, other_field: &str) -> Self {
        self.check(
            |v| v == other_value,
            || format!("Field must be equal to {other_field}."),
        )
    }

    /// The file name must end in one of `allowed` (case-insensitive).
    pub fn file_allowed(self, allowed: &[&str]) -> Self {
        self.check(
            |v| file_extension(v).is_some_and(|ext| allowed.contains(&ext.as_str())),
            || {
                format!(
                    "File does not have an approved extension: {}",
                    allowed.join(", ")
                )
            },
        )
    }

    /// The value must be one of `choices`.
    pub fn one_of<'c>(self, mut choices: impl Iterator<Item = &'c str>) -> Self {
        self.check(
            |v| choices.any(|c| c == v.trim()),
            || "Not a valid choice.".to_string(),
        )
    }

    pub fn into_error(self) -> Option<String> {
        self.error
    }
}

/// Lowercased extension of an uploaded file name, without the dot.
pub fn file_extension(filename: &str) -> Option<String> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_blank() {
        assert!(Field::new("   ").required().into_error().is_some());
        assert!(Field::new("x").required().into_error().is_none());
    }

    #[test]
    fn test_first_failure_wins() {
        let err = Field::new("").required().length(2, 20).into_error();
        assert_eq!(err.as_deref(), Some("This field is required."));
    }

    #[test]
    fn test_length_counts_chars() {
        assert!(Field::new("éé").length(2, 2).into_error().is_none());
        assert!(Field::new(&"a".repeat(21)).length(2, 20).into_error().is_some());
    }

    #[test]
    fn test_email_format() {
        for ok in ["a@b.co", "first.last@mail.example.org"] {
            assert!(Field::new(ok).email().into_error().is_none(), "{ok}");
        }
        for bad in ["plain", "@b.co", "a@b", "a@@b.co", "a b@c.io", "a@b..io"] {
            assert!(Field::new(bad).email().into_error().is_some(), "{bad}");
        }
    }

    #[test]
    fn test_equal_to() {
        let err = Field::new("one").equal_to("two", "password").into_error();
        assert_eq!(err.as_deref(), Some("Field must be equal to password."));
    }

    #[test]
    fn test_file_allowed_is_case_insensitive() {
        let allowed = ["jpg", "png", "svg"];
        assert!(Field::new("me.PNG").file_allowed(&allowed).into_error().is_none());
        assert!(Field::new("me.gif").file_allowed(&allowed).into_error().is_some());
        assert!(Field::new("noext").file_allowed(&allowed).into_error().is_some());
    }

    #[test]
    fn test_file_extension_ignores_directories() {
        assert_eq!(file_extension("../../etc/x.JPG").as_deref(), Some("jpg"));
        assert_eq!(file_extension(".png"), None);
        assert_eq!(file_extension("a.b/c"), None);
    }
}
