/// An element's class attribute: ordered, without duplicates, like a DOM
/// `classList`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList(Vec<String>);

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<S: AsRef<str>>(&mut self, classes: &[S]) {
        for class in classes {
            let class = class.as_ref();
            if !class.is_empty() && !self.contains(class) {
                self.0.push(class.to_string());
            }
        }
    }

    pub fn remove<S: AsRef<str>>(&mut self, classes: &[S]) {
        self.0
            .retain(|existing| !classes.iter().any(|class| class.as_ref() == existing));
    }

    pub fn contains(&self, class: &str) -> bool {
        self.0.iter().any(|existing| existing == class)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Space separated, ready for a `class` attribute.
    pub fn to_attr(&self) -> String {
        self.0.join(" ")
    }
}

impl<S: AsRef<str>> FromIterator<S> for ClassList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = ClassList::new();
        for class in iter {
            list.add(&[class.as_ref()]);
        }
        list
    }
}
