//! The beach line: the arcs of parabolas currently visible from the sweep line.
//!
//! It is kept as a binary tree inside an arena. Leaves are arcs, holding the site of their
//! parabola. Internal nodes are breakpoints between the rightmost arc of their left subtree and
//! the leftmost arc of their right subtree; their position depends on the sweep line, so it is
//! computed on demand and never stored.

use crate::debugln;
use crate::error::Error;
use crate::geometry::{breakpoint_x, Site};
use crate::heap::Handle;
use crate::SiteIdx;

macro_rules! test_assert {
    ($cond:expr) => {
        #[cfg(all(debug_assertions, not(coverage)))]
        {
            assert!($cond);
        }
    };
    ($cond:expr, $($arg:tt)*) => {
        #[cfg(all(debug_assertions, not(coverage)))]
        {
            assert!($cond, $($arg)*);
        }
    };
}

/// The index of a node in the beach line arena. Ids are not reused until the beach line is
/// cleared.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub struct NodeId(u32);

#[derive(Clone, Debug)]
enum Kind {
    Arc {
        site: SiteIdx,
        /// The circle events that would remove this arc.
        events: Vec<Handle>,
    },
    Breakpoint {
        left: NodeId,
        right: NodeId,
    },
    /// The node was split or removed.
    Vacant,
}

#[derive(Clone, Debug)]
struct Node {
    parent: Option<NodeId>,
    kind: Kind,
}

#[derive(Clone, Default)]
pub struct Beachline {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}
impl std::fmt::Debug for Beachline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.arcs()).finish()
    }
}
impl Beachline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Check if the node is still part of the tree.
    pub fn contains(&self, node: NodeId) -> bool {
        !matches!(self.kind(node), None | Some(Kind::Vacant))
    }

    pub fn is_leaf(&self, node: NodeId) -> bool {
        matches!(self.kind(node), Some(Kind::Arc { .. }))
    }

    /// The site of an arc.
    pub fn site(&self, arc: NodeId) -> Option<SiteIdx> {
        match self.kind(arc)? {
            Kind::Arc { site, .. } => Some(*site),
            _ => None,
        }
    }

    /// The sites of the arcs, from left to right.
    pub fn arcs(&self) -> impl Iterator<Item = SiteIdx> + '_ {
        let mut next = self.root.map(|r| self.leftmost(r));
        std::iter::from_fn(move || {
            let node = next?;
            next = self.next_arc(node);
            self.site(node)
        })
    }

    /// Make `site` the only arc of an empty beach line.
    pub fn insert_root(&mut self, site: SiteIdx) -> Result<NodeId, Error> {
        if self.root.is_some() {
            return Err(Error::NotEmpty);
        }
        let root = self.alloc(None, leaf(site));
        self.root = Some(root);
        Ok(root)
    }

    /// Find the arc vertically above the point of abscissa `x`.
    ///
    /// A point exactly below a breakpoint belongs to the arc on its right.
    pub fn find_arc_above(&self, sites: &[Site], x: i32, sweep: f64) -> Result<NodeId, Error> {
        let mut node = self.root.ok_or(Error::EmptyBeachline)?;
        let x = x as f64;

        while let Kind::Breakpoint { left, right } = self.node(node)?.kind {
            let bx = self.breakpoint_x(sites, node, sweep)?;
            debugln!("at breakpoint {:?}: {} <=> {}", node, x, bx);
            node = if x < bx { left } else { right };
        }

        Ok(node)
    }

    /// The current position of a breakpoint.
    pub fn breakpoint_x(&self, sites: &[Site], node: NodeId, sweep: f64) -> Result<f64, Error> {
        let Kind::Breakpoint { left, right } = self.node(node)?.kind else {
            return Err(Error::NotABreakpoint(node));
        };
        let l = self.site_of(self.rightmost(left))?;
        let r = self.site_of(self.leftmost(right))?;
        Ok(breakpoint_x(sites[l as usize], sites[r as usize], sweep))
    }

    /// Replace `arc` by the sequence `arc, new_site, arc`. Returns the arc of `new_site`.
    ///
    /// ```text
    ///      (  )
    ///     /    \
    /// [old]    (  )
    ///         /    \
    ///     [new]    [old]
    /// ```
    ///
    /// The replaced node becomes vacant. Its circle events are dropped, so the caller must take
    /// and cancel them first.
    pub fn split(&mut self, arc: NodeId, new_site: SiteIdx) -> Result<NodeId, Error> {
        let old_site = self.site_of(arc)?;
        let parent = self.node(arc)?.parent;

        let top = self.alloc(parent, Kind::Vacant);
        let left = self.alloc(Some(top), leaf(old_site));
        let inner = self.alloc(Some(top), Kind::Vacant);
        let new = self.alloc(Some(inner), leaf(new_site));
        let right = self.alloc(Some(inner), leaf(old_site));

        self.nodes[inner.0 as usize].kind = Kind::Breakpoint { left: new, right };
        self.nodes[top.0 as usize].kind = Kind::Breakpoint { left, right: inner };
        self.replace(arc, top);

        debugln!("split {:?} into {:?}", arc, self);
        Ok(new)
    }

    /// Replace `arc` by the two arcs of its site and `new_site`, side by side in x order.
    /// Returns the arc of `new_site`.
    ///
    /// This is the split for an arc whose site lies on the sweep line: its parabola is still
    /// a vertical ray, so there is no part of it on both sides of the new one.
    pub fn split_beside(
        &mut self,
        sites: &[Site],
        arc: NodeId,
        new_site: SiteIdx,
    ) -> Result<NodeId, Error> {
        let old_site = self.site_of(arc)?;
        let parent = self.node(arc)?.parent;

        let top = self.alloc(parent, Kind::Vacant);
        let old = self.alloc(Some(top), leaf(old_site));
        let new = self.alloc(Some(top), leaf(new_site));

        let (left, right) = if sites[new_site as usize].x < sites[old_site as usize].x {
            (new, old)
        } else {
            (old, new)
        };
        self.nodes[top.0 as usize].kind = Kind::Breakpoint { left, right };
        self.replace(arc, top);

        debugln!("split {:?} beside into {:?}", arc, self);
        Ok(new)
    }

    /// Remove a squeezed arc, replacing its parent breakpoint by its sibling subtree.
    ///
    /// Returns the arcs that were to the left and to the right of the removed one, which are
    /// now neighbors.
    pub fn remove(&mut self, arc: NodeId) -> Result<(Option<NodeId>, Option<NodeId>), Error> {
        self.site_of(arc)?;
        let parent = self.node(arc)?.parent.ok_or(Error::NoParent(arc))?;

        let left = self.prev_arc(arc);
        let right = self.next_arc(arc);

        let Kind::Breakpoint {
            left: parent_left,
            right: parent_right,
        } = self.node(parent)?.kind
        else {
            unreachable!("the parent of a node is always a breakpoint");
        };
        let sibling = if parent_left == arc {
            parent_right
        } else {
            parent_left
        };

        self.replace(parent, sibling);
        self.nodes[arc.0 as usize] = Node {
            parent: None,
            kind: Kind::Vacant,
        };

        test_assert!(right.map_or(true, |r| self.prev_arc(r) == left));
        debugln!("removed {:?}: {:?}", arc, self);
        Ok((left, right))
    }

    /// The arc immediately to the left.
    pub fn prev_arc(&self, leaf: NodeId) -> Option<NodeId> {
        let mut node = leaf;
        loop {
            let parent = self.nodes.get(node.0 as usize)?.parent?;
            match self.nodes[parent.0 as usize].kind {
                Kind::Breakpoint { left, right } if right == node => {
                    return Some(self.rightmost(left))
                }
                _ => node = parent,
            }
        }
    }

    /// The arc immediately to the right.
    pub fn next_arc(&self, leaf: NodeId) -> Option<NodeId> {
        let mut node = leaf;
        loop {
            let parent = self.nodes.get(node.0 as usize)?.parent?;
            match self.nodes[parent.0 as usize].kind {
                Kind::Breakpoint { left, right } if left == node => {
                    return Some(self.leftmost(right))
                }
                _ => node = parent,
            }
        }
    }

    /// Register a circle event that would remove `arc`.
    pub fn attach_event(&mut self, arc: NodeId, event: Handle) -> Result<(), Error> {
        match self.node_mut(arc)? {
            Node {
                kind: Kind::Arc { events, .. },
                ..
            } => {
                events.push(event);
                Ok(())
            }
            _ => Err(Error::NotAnArc(arc)),
        }
    }

    /// Take the circle events registered on an arc.
    pub fn take_events(&mut self, node: NodeId) -> Vec<Handle> {
        match self.nodes.get_mut(node.0 as usize) {
            Some(Node {
                kind: Kind::Arc { events, .. },
                ..
            }) => std::mem::take(events),
            _ => Vec::new(),
        }
    }

    fn alloc(&mut self, parent: Option<NodeId>, kind: Kind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { parent, kind });
        id
    }

    /// Put `new` in the place of `old` in the tree, and make `old` vacant.
    fn replace(&mut self, old: NodeId, new: NodeId) {
        let parent = self.nodes[old.0 as usize].parent;
        self.nodes[new.0 as usize].parent = parent;

        match parent {
            None => self.root = Some(new),
            Some(p) => match &mut self.nodes[p.0 as usize].kind {
                Kind::Breakpoint { left, .. } if *left == old => *left = new,
                Kind::Breakpoint { right, .. } => {
                    test_assert!(*right == old);
                    *right = new
                }
                _ => unreachable!("the parent of a node is always a breakpoint"),
            },
        }

        self.nodes[old.0 as usize] = Node {
            parent: None,
            kind: Kind::Vacant,
        };
    }

    fn leftmost(&self, mut node: NodeId) -> NodeId {
        while let Kind::Breakpoint { left, .. } = self.nodes[node.0 as usize].kind {
            node = left;
        }
        node
    }

    fn rightmost(&self, mut node: NodeId) -> NodeId {
        while let Kind::Breakpoint { right, .. } = self.nodes[node.0 as usize].kind {
            node = right;
        }
        node
    }

    fn kind(&self, node: NodeId) -> Option<&Kind> {
        self.nodes.get(node.0 as usize).map(|n| &n.kind)
    }

    fn node(&self, node: NodeId) -> Result<&Node, Error> {
        match self.nodes.get(node.0 as usize) {
            Some(Node {
                kind: Kind::Vacant, ..
            })
            | None => Err(Error::Vacant(node)),
            Some(n) => Ok(n),
        }
    }

    fn node_mut(&mut self, node: NodeId) -> Result<&mut Node, Error> {
        match self.nodes.get_mut(node.0 as usize) {
            Some(Node {
                kind: Kind::Vacant, ..
            })
            | None => Err(Error::Vacant(node)),
            Some(n) => Ok(n),
        }
    }

    fn site_of(&self, arc: NodeId) -> Result<SiteIdx, Error> {
        match self.node(arc)?.kind {
            Kind::Arc { site, .. } => Ok(site),
            _ => Err(Error::NotAnArc(arc)),
        }
    }
}

fn leaf(site: SiteIdx) -> Kind {
    Kind::Arc {
        site,
        events: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Check that every child points back to its parent, and return the number of arcs.
    fn assert_links(beachline: &Beachline) -> usize {
        fn walk(b: &Beachline, node: NodeId, parent: Option<NodeId>) -> usize {
            assert_eq!(b.nodes[node.0 as usize].parent, parent, "parent of {:?}", node);
            match b.nodes[node.0 as usize].kind {
                Kind::Arc { .. } => 1,
                Kind::Breakpoint { left, right } => {
                    walk(b, left, Some(node)) + walk(b, right, Some(node))
                }
                Kind::Vacant => panic!("vacant node {:?} in the tree", node),
            }
        }
        beachline.root.map_or(0, |r| walk(beachline, r, None))
    }

    fn sites() -> Vec<Site> {
        vec![Site::new(0, 0), Site::new(10, 0), Site::new(5, 10), Site::new(8, 12)]
    }

    #[test]
    fn empty() {
        let mut beachline = Beachline::new();
        assert!(beachline.is_empty());
        assert_eq!(
            beachline.find_arc_above(&sites(), 3, 0.0),
            Err(Error::EmptyBeachline)
        );

        let root = beachline.insert_root(0).unwrap();
        assert!(!beachline.is_empty());
        assert!(beachline.is_leaf(root));
        assert_eq!(beachline.insert_root(1), Err(Error::NotEmpty));
        assert_eq!(beachline.find_arc_above(&sites(), 3, 0.0), Ok(root));
        assert_eq!(beachline.remove(root), Err(Error::NoParent(root)));
    }

    #[test]
    fn split_in_three() {
        let sites = sites();
        let mut beachline = Beachline::new();
        let root = beachline.insert_root(0).unwrap();

        let new = beachline.split(root, 2).unwrap();
        assert_eq!(beachline.arcs().collect::<Vec<_>>(), [0, 2, 0]);
        assert_eq!(assert_links(&beachline), 3);

        assert!(!beachline.contains(root));
        assert_eq!(beachline.split(root, 3), Err(Error::Vacant(root)));

        let top = beachline.root().unwrap();
        assert!(!beachline.is_leaf(top));
        assert_eq!(beachline.site(top), None);
        assert_eq!(beachline.split(top, 3), Err(Error::NotAnArc(top)));

        let prev = beachline.prev_arc(new).unwrap();
        let next = beachline.next_arc(new).unwrap();
        assert_eq!(beachline.site(new), Some(2));
        assert_eq!(beachline.site(prev), Some(0));
        assert_eq!(beachline.site(next), Some(0));
        assert_eq!(beachline.prev_arc(prev), None);
        assert_eq!(beachline.next_arc(next), None);

        // the new arc is still a point, both breakpoints are at its x
        assert_eq!(beachline.find_arc_above(&sites, 4, 10.0), Ok(prev));
        assert_eq!(beachline.find_arc_above(&sites, 5, 10.0), Ok(next));
        assert_eq!(beachline.find_arc_above(&sites, 6, 10.0), Ok(next));
        // later the new arc widens
        assert_eq!(beachline.find_arc_above(&sites, 5, 12.0), Ok(new));
    }

    #[test]
    fn split_beside() {
        let sites = sites();
        let mut beachline = Beachline::new();
        let root = beachline.insert_root(1).unwrap();

        let new = beachline.split_beside(&sites, root, 0).unwrap();
        assert_eq!(beachline.arcs().collect::<Vec<_>>(), [0, 1]);
        assert_eq!(beachline.next_arc(new).and_then(|a| beachline.site(a)), Some(1));
        assert_eq!(assert_links(&beachline), 2);

        let top = beachline.root().unwrap();
        assert_eq!(beachline.breakpoint_x(&sites, top, 0.0), Ok(5.0));
        assert_eq!(beachline.breakpoint_x(&sites, new, 0.0), Err(Error::NotABreakpoint(new)));
    }

    #[test]
    fn remove_collapses_parent() {
        let sites = sites();
        let mut beachline = Beachline::new();
        let a = beachline.insert_root(0).unwrap();
        let b = beachline.split_beside(&sites, a, 1).unwrap();
        let c = beachline.split(b, 2).unwrap();
        assert_eq!(beachline.arcs().collect::<Vec<_>>(), [0, 1, 2, 1]);

        let b_left = beachline.prev_arc(c).unwrap();
        let d = beachline.split(c, 3).unwrap();
        assert_eq!(beachline.arcs().collect::<Vec<_>>(), [0, 1, 2, 3, 2, 1]);
        assert_eq!(assert_links(&beachline), 6);

        let c_left = beachline.prev_arc(d).unwrap();
        let (left, right) = beachline.remove(c_left).unwrap();
        assert_eq!(left, Some(b_left));
        assert_eq!(right, Some(d));
        assert_eq!(beachline.arcs().collect::<Vec<_>>(), [0, 1, 3, 2, 1]);
        assert_eq!(assert_links(&beachline), 5);
        assert_eq!(beachline.remove(c_left), Err(Error::Vacant(c_left)));

        let first = beachline.prev_arc(b_left).unwrap();
        let (left, right) = beachline.remove(first).unwrap();
        assert_eq!(left, None);
        assert_eq!(right, Some(b_left));
        assert_eq!(beachline.arcs().collect::<Vec<_>>(), [1, 3, 2, 1]);
        assert_eq!(assert_links(&beachline), 4);
    }

    #[test]
    fn events_follow_the_arc() {
        let mut heap = crate::heap::Heap::new(u8::cmp);
        let (h1, h2) = (heap.push(1), heap.push(2));

        let mut beachline = Beachline::new();
        let root = beachline.insert_root(0).unwrap();
        beachline.attach_event(root, h1).unwrap();
        beachline.attach_event(root, h2).unwrap();

        assert_eq!(beachline.take_events(root), [h1, h2]);
        assert!(beachline.take_events(root).is_empty());

        let new = beachline.split(root, 1).unwrap();
        let top = beachline.root().unwrap();
        assert_eq!(beachline.attach_event(top, h1), Err(Error::NotAnArc(top)));
        assert_eq!(beachline.attach_event(root, h1), Err(Error::Vacant(root)));
        assert!(beachline.take_events(new).is_empty());
    }
}
