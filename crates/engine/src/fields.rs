//! Ordered field lists for brace-delimited record payloads.

/// Ordered `(name, value)` pairs, e.g. `X 335.22, Y -12.5`.
///
/// Order is the order fields were pushed; rendering follows it. Names are
/// unique: setting an existing name updates it in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldList {
    fields: Vec<(String, String)>,
}

impl FieldList {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Build from fixed names, all set to `value`.
    pub fn uniform(names: &[&str], value: &str) -> Self {
        Self {
            fields: names.iter().map(|n| (n.to_string(), value.to_string())).collect(),
        }
    }

    /// Insert or update. New names are appended.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Update only names already present. Returns whether `name` was present.
    pub fn overwrite(&mut self, name: &str, value: &str) -> bool {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => {
                slot.1 = value.to_string();
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Overlay `source` onto `self`: names present in both take the source
    /// value, names only in `self` keep theirs, names only in `source` are
    /// ignored.
    pub fn overlay(&mut self, source: &FieldList) {
        for (name, value) in source.iter() {
            self.overwrite(name, value);
        }
    }

    /// `X 1.0, Y 2.0` with the given separator between fields.
    pub fn render(&self, separator: &str) -> String {
        self.fields
            .iter()
            .map(|(n, v)| format!("{n} {v}"))
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for FieldList {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut list = FieldList::new();
        for (n, v) in iter {
            list.set(n, v);
        }
        list
    }
}

impl std::fmt::Display for FieldList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.render(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_updates_in_place() {
        let mut list: FieldList = [("X", "1.0"), ("Y", "2.0")].into_iter().collect();
        list.set("X", "9.0");
        list.set("Z", "3.0");
        assert_eq!(list.render(", "), "X 9.0, Y 2.0, Z 3.0");
    }

    #[test]
    fn overlay_never_invents_fields() {
        let mut target: FieldList = [("Y", "2.0"), ("X", "1.0")].into_iter().collect();
        let source: FieldList = [("X", "9.0"), ("C", "4.0")].into_iter().collect();
        target.overlay(&source);
        assert_eq!(target.render(", "), "Y 2.0, X 9.0");
    }

    #[test]
    fn display_wraps_in_braces() {
        let list = FieldList::uniform(&["A1", "A2"], "0.0");
        assert_eq!(list.to_string(), "{A1 0.0, A2 0.0}");
    }
}
