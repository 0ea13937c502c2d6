#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    Doctype(String),
}

#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value.to_owned(),
            None => self.attrs.push((name.to_owned(), value.to_owned())),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(n, _)| n != name);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|v| v.split_ascii_whitespace().any(|c| c == class))
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    pub fn walk_descendants(&self, visit: &mut impl FnMut(&Element)) {
        walk(&self.children, visit);
    }

    pub fn walk_descendants_mut(&mut self, visit: &mut impl FnMut(&mut Element)) {
        walk_mut(&mut self.children, visit);
    }
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    pub nodes: Vec<Node>,
}

impl Document {
    /// Pre-order over every element, i.e. document order of the serialized page.
    pub fn walk_elements(&self, visit: &mut impl FnMut(&Element)) {
        walk(&self.nodes, visit);
    }

    pub fn walk_elements_mut(&mut self, visit: &mut impl FnMut(&mut Element)) {
        walk_mut(&mut self.nodes, visit);
    }

    pub fn count_elements(&self, matches: &impl Fn(&Element) -> bool) -> usize {
        let mut count = 0usize;
        self.walk_elements(&mut |el| {
            if matches(el) {
                count += 1;
            }
        });
        count
    }

    /// Child-index path to the first matching element, in document order.
    pub fn find_element_path(&self, matches: &impl Fn(&Element) -> bool) -> Option<Vec<usize>> {
        let mut path = Vec::new();
        if find_path_in(&self.nodes, matches, &mut path) {
            return Some(path);
        }
        None
    }

    pub fn element_at_path_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        let (last, rest) = path.split_last()?;
        let mut nodes = &mut self.nodes;
        for idx in rest {
            match nodes.get_mut(*idx)? {
                Node::Element(el) => nodes = &mut el.children,
                _ => return None,
            }
        }
        match nodes.get_mut(*last)? {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Splices `node` in as the immediate preceding sibling of the first
    /// element matching the predicate. Returns false if nothing matched.
    pub fn insert_before(&mut self, matches: &impl Fn(&Element) -> bool, node: Node) -> bool {
        let Some(path) = self.find_element_path(matches) else {
            return false;
        };
        let Some((last, parent_path)) = path.split_last() else {
            return false;
        };

        if parent_path.is_empty() {
            self.nodes.insert(*last, node);
            return true;
        }

        let Some(parent) = self.element_at_path_mut(parent_path) else {
            return false;
        };
        parent.children.insert(*last, node);
        true
    }
}

fn walk(nodes: &[Node], visit: &mut impl FnMut(&Element)) {
    for node in nodes {
        if let Node::Element(el) = node {
            visit(el);
            walk(&el.children, visit);
        }
    }
}

fn walk_mut(nodes: &mut [Node], visit: &mut impl FnMut(&mut Element)) {
    for node in nodes {
        if let Node::Element(el) = node {
            visit(el);
            walk_mut(&mut el.children, visit);
        }
    }
}

fn find_path_in(nodes: &[Node], matches: &impl Fn(&Element) -> bool, path: &mut Vec<usize>) -> bool {
    for (idx, node) in nodes.iter().enumerate() {
        if let Node::Element(el) = node {
            path.push(idx);
            if matches(el) || find_path_in(&el.children, matches, path) {
                return true;
            }
            path.pop();
        }
    }
    false
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => collect_text(&el.children, out),
            Node::Comment(_) | Node::Doctype(_) => {}
        }
    }
}
