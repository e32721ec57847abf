/// One step of a location inside the specification tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaPathElem {
    /// Object key.
    Field(&'static str),
    /// Array index.
    Index(usize),
    /// Every element of an array (`[*]`).
    Each,
}

/// Render a path dot/bracket style, e.g. `topo.aps[0].channel`.
///
/// The empty path is the document root and renders as `root`.
pub fn format_path(path: &[SchemaPathElem]) -> String {
    if path.is_empty() {
        return "root".to_owned();
    }

    let mut s = String::new();
    for p in path {
        match *p {
            SchemaPathElem::Field(name) => {
                if !s.is_empty() {
                    s.push('.');
                }
                s.push_str(name);
            }
            SchemaPathElem::Index(i) => {
                s.push('[');
                s.push_str(&i.to_string());
                s.push(']');
            }
            SchemaPathElem::Each => s.push_str("[*]"),
        }
    }
    s
}
