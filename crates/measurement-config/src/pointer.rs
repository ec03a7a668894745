//! RFC 6901 JSON pointers naming positions inside a value tree.

use std::fmt;

/// Escapes one pointer token component.
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    component.replace('~', "~0").replace('/', "~1")
}

/// Formats unescaped path components into a pointer.
pub fn format_json_pointer(path: &[String]) -> String {
    let mut out = String::new();
    for component in path {
        out.push('/');
        out.push_str(&escape_component(component));
    }
    out
}

/// Mutable cursor into a tree, pushed on descent and popped on return.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, component: impl Into<String>) {
        self.0.push(component.into());
    }

    pub fn pop(&mut self) {
        self.0.pop();
    }

    /// Runs `f` with `component` pushed, popping it again afterwards.
    pub fn scoped<T>(&mut self, component: impl Into<String>, f: impl FnOnce(&mut Self) -> T) -> T {
        self.push(component);
        let out = f(self);
        self.pop();
        out
    }

    pub fn pointer(&self) -> String {
        format_json_pointer(&self.0)
    }

    /// Pointer to `component` below the current position.
    pub fn child_pointer(&self, component: &str) -> String {
        let mut out = self.pointer();
        out.push('/');
        out.push_str(&escape_component(component));
        out
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pointer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_matrix() {
        assert_eq!(format_json_pointer(&[]), "");
        assert_eq!(format_json_pointer(&["".into()]), "/");
        assert_eq!(
            format_json_pointer(&["a/b".into(), "~k".into(), "0".into()]),
            "/a~1b/~0k/0"
        );
    }

    #[test]
    fn scoped_restores_position() {
        let mut path = FieldPath::new();
        path.push("data");
        let inner = path.scoped("q0", |p| p.scoped(3.to_string(), |p| p.pointer()));
        assert_eq!(inner, "/data/q0/3");
        assert_eq!(path.pointer(), "/data");
        assert_eq!(path.child_pointer("x/y"), "/data/x~1y");
    }
}
