use std::collections::VecDeque;

/// Activity flags used by compression.
pub trait Activity {
    /// Returns whether the member currently counts toward compression.
    fn is_active(&self) -> bool;

    /// Returns whether any descendant of the member is active.
    fn has_active_downline(&self) -> bool;

    /// Returns whether the member survives compression.
    fn is_retained(&self) -> bool {
        self.is_active() || self.has_active_downline()
    }
}

/// A node of a member network.
///
/// Children are kept in join (or placement) order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct NetworkNode {
    /// Member id.
    pub id: String,
    /// Direct children.
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<NetworkNode>,
    /// Whether the member is active.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_active: bool,
    /// Whether any descendant is active.
    #[cfg_attr(feature = "serde", serde(default))]
    pub has_active_downline: bool,
}

impl NetworkNode {
    /// Create an active node without children.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            children: Vec::new(),
            is_active: true,
            has_active_downline: false,
        }
    }

    /// Set activity.
    pub fn with_active(self, is_active: bool) -> Self {
        Self { is_active, ..self }
    }

    /// Set children.
    pub fn with_children(self, children: impl IntoIterator<Item = NetworkNode>) -> Self {
        Self {
            children: children.into_iter().collect(),
            ..self
        }
    }

    /// Find the node with the given id in this subtree, in breadth-first order.
    pub fn find(&self, id: &str) -> Option<&NetworkNode> {
        let mut queue = VecDeque::from([self]);
        while let Some(node) = queue.pop_front() {
            if node.id == id {
                return Some(node);
            }
            queue.extend(node.children.iter());
        }
        None
    }

    /// Recompute `has_active_downline` for every node of this subtree.
    ///
    /// Returns whether this node or any of its descendants is active.
    pub fn refresh_active_downline(&mut self) -> bool {
        let mut has_active_downline = false;
        for child in self.children.iter_mut() {
            has_active_downline |= child.refresh_active_downline();
        }
        self.has_active_downline = has_active_downline;
        self.is_active || has_active_downline
    }

    fn node_at_mut(&mut self, path: &[usize]) -> &mut NetworkNode {
        path.iter().fold(self, |node, index| &mut node.children[*index])
    }
}

impl Activity for NetworkNode {
    fn is_active(&self) -> bool {
        self.is_active
    }

    fn has_active_downline(&self) -> bool {
        self.has_active_downline
    }
}

/// A member of an upline chain.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct UplineMember {
    /// Member id.
    pub id: String,
    /// Whether the member is active.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_active: bool,
    /// Whether any descendant is active.
    #[cfg_attr(feature = "serde", serde(default))]
    pub has_active_downline: bool,
}

impl UplineMember {
    /// Create a new [`UplineMember`].
    pub fn new(id: impl Into<String>, is_active: bool, has_active_downline: bool) -> Self {
        Self {
            id: id.into(),
            is_active,
            has_active_downline,
        }
    }
}

impl Activity for UplineMember {
    fn is_active(&self) -> bool {
        self.is_active
    }

    fn has_active_downline(&self) -> bool {
        self.has_active_downline
    }
}

/// Keep only the levels that are active or have an active downline.
///
/// The relative order of retained levels is preserved.
pub fn compress_levels<L>(levels: &[L]) -> Vec<L>
where
    L: Activity + Clone,
{
    levels
        .iter()
        .filter(|level| level.is_retained())
        .cloned()
        .collect()
}

/// The placement of a spilled-over node.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    /// Id of the placed node.
    pub node: String,
    /// Id of its new parent.
    pub parent: String,
}

/// Report of a spillover.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct SpilloverReport {
    placements: Vec<Placement>,
    unplaced: Vec<NetworkNode>,
}

impl SpilloverReport {
    /// Get placements, in placement order.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Get the nodes that could not be placed anywhere in the tree.
    pub fn unplaced(&self) -> &[NetworkNode] {
        &self.unplaced
    }

    /// Returns whether every overflowing node has been placed.
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// Take the unplaced nodes.
    pub fn into_unplaced(self) -> Vec<NetworkNode> {
        self.unplaced
    }
}

/// Move the children of `node` beyond `max_width` down the tree.
///
/// Overflowing children are detached and placed one by one under the first node,
/// in breadth-first order starting from `node`, having fewer than `max_width` children.
/// A node keeps receiving children until it is full. When `max_depth` is set, nodes at
/// that depth or deeper (the root being at depth `0`) never receive children.
///
/// Nodes that cannot be placed are returned in the report.
pub fn apply_spillover(
    node: &mut NetworkNode,
    max_width: usize,
    max_depth: Option<usize>,
) -> crate::Result<SpilloverReport> {
    if max_width == 0 {
        return Err(crate::Error::InvalidArgument("max width must be positive"));
    }
    if node.children.len() <= max_width {
        return Ok(SpilloverReport::default());
    }

    let mut pending = VecDeque::from(node.children.split_off(max_width));
    let mut placements = Vec::with_capacity(pending.len());
    let mut queue = VecDeque::from([Vec::<usize>::new()]);

    while !pending.is_empty() {
        let Some(path) = queue.pop_front() else {
            break;
        };
        let current = node.node_at_mut(&path);
        let can_receive = max_depth.map_or(true, |max_depth| path.len() < max_depth);
        while can_receive && current.children.len() < max_width {
            let Some(child) = pending.pop_front() else {
                break;
            };
            tracing::trace!(node = %child.id, parent = %current.id, "spilled over");
            placements.push(Placement {
                node: child.id.clone(),
                parent: current.id.clone(),
            });
            current.children.push(child);
        }
        queue.extend((0..current.children.len()).map(|index| {
            let mut child = path.clone();
            child.push(index);
            child
        }));
    }

    let unplaced = Vec::from(pending);
    if unplaced.is_empty() {
        tracing::debug!(root = %node.id, placed = placements.len(), "applied spillover");
    } else {
        tracing::warn!(
            root = %node.id,
            placed = placements.len(),
            unplaced = unplaced.len(),
            "network is saturated, some nodes could not be placed"
        );
    }

    Ok(SpilloverReport {
        placements,
        unplaced,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(nodes: &[NetworkNode]) -> Vec<&str> {
        nodes.iter().map(|node| node.id.as_str()).collect()
    }

    fn leaves(ids: &[&str]) -> Vec<NetworkNode> {
        ids.iter().map(|id| NetworkNode::new(*id)).collect()
    }

    #[test]
    fn test_compress_levels() {
        let levels = vec![
            UplineMember::new("a", true, false),
            UplineMember::new("b", false, false),
            UplineMember::new("c", false, true),
            UplineMember::new("d", false, false),
            UplineMember::new("e", true, true),
        ];
        let compressed = compress_levels(&levels);
        assert_eq!(
            compressed.iter().map(|m| m.id.as_str()).collect::<Vec<_>>(),
            ["a", "c", "e"]
        );
        assert_eq!(compress_levels(&compressed), compressed);
        assert!(compress_levels::<UplineMember>(&[]).is_empty());
    }

    #[test]
    fn test_no_spillover_within_width() -> crate::Result<()> {
        let mut root = NetworkNode::new("root").with_children(leaves(&["a", "b"]));
        let before = root.clone();
        let report = apply_spillover(&mut root, 2, None)?;
        assert!(report.placements().is_empty());
        assert!(report.is_complete());
        assert_eq!(root, before);
        Ok(())
    }

    #[test]
    fn test_binary_spillover() -> crate::Result<()> {
        let mut root = NetworkNode::new("root").with_children(leaves(&["a", "b", "c"]));
        let report = apply_spillover(&mut root, 2, None)?;
        assert_eq!(ids(&root.children), ["a", "b"]);
        assert_eq!(ids(&root.children[0].children), ["c"]);
        assert!(root.children[1].children.is_empty());
        assert_eq!(
            report.placements(),
            [Placement {
                node: "c".to_string(),
                parent: "a".to_string()
            }]
        );
        Ok(())
    }

    #[test]
    fn test_node_is_filled_before_moving_on() -> crate::Result<()> {
        let mut root =
            NetworkNode::new("root").with_children(leaves(&["a", "b", "c", "d", "e", "f", "g"]));
        let report = apply_spillover(&mut root, 2, None)?;
        assert!(report.is_complete());
        assert_eq!(ids(&root.children), ["a", "b"]);
        assert_eq!(ids(&root.children[0].children), ["c", "d"]);
        assert_eq!(ids(&root.children[1].children), ["e", "f"]);
        // Level-order continues with the children of `a`.
        assert_eq!(ids(&root.children[0].children[0].children), ["g"]);
        Ok(())
    }

    #[test]
    fn test_full_nodes_are_skipped() -> crate::Result<()> {
        let a = NetworkNode::new("a").with_children(leaves(&["a1", "a2", "a3"]));
        let b = NetworkNode::new("b").with_children(leaves(&["b1"]));
        let mut root = NetworkNode::new("root").with_children([a, b, NetworkNode::new("c")]);
        let report = apply_spillover(&mut root, 2, None)?;
        assert_eq!(report.placements().len(), 1);
        assert_eq!(report.placements()[0].parent, "b");
        // `a` exceeded the width before the call and is left untouched.
        assert_eq!(root.children[0].children.len(), 3);
        assert_eq!(ids(&root.children[1].children), ["b1", "c"]);
        Ok(())
    }

    #[test]
    fn test_spilled_subtrees_are_kept() -> crate::Result<()> {
        let c = NetworkNode::new("c").with_children(leaves(&["c1"]));
        let mut root = NetworkNode::new("root").with_children([
            NetworkNode::new("a"),
            c,
            NetworkNode::new("d"),
        ]);
        let report = apply_spillover(&mut root, 1, None)?;
        assert!(report.is_complete());
        // Width 1: `c` goes under `a`, then `d` goes under `c1`, the first leaf reached.
        assert_eq!(ids(&root.children), ["a"]);
        let c = root.find("c").expect("must exist");
        assert_eq!(ids(&c.children), ["c1"]);
        assert_eq!(ids(&root.find("c1").expect("must exist").children), ["d"]);
        Ok(())
    }

    #[test]
    fn test_matrix_depth_limit_returns_unplaced() -> crate::Result<()> {
        let mut root =
            NetworkNode::new("root").with_children(leaves(&["a", "b", "c", "d", "e", "f", "g"]));
        let report = apply_spillover(&mut root, 2, Some(2))?;
        assert_eq!(report.placements().len(), 4);
        assert_eq!(ids(report.unplaced()), ["g"]);
        assert!(!report.is_complete());
        assert!(root.children[0].children[0].children.is_empty());
        Ok(())
    }

    #[test]
    fn test_zero_width_is_rejected() {
        let mut root = NetworkNode::new("root").with_children(leaves(&["a"]));
        assert!(matches!(
            apply_spillover(&mut root, 0, None),
            Err(crate::Error::InvalidArgument(_))
        ));
        assert_eq!(root.children.len(), 1);
    }

    #[test]
    fn test_refresh_active_downline() {
        let mut root = NetworkNode::new("root").with_children([
            NetworkNode::new("a")
                .with_active(false)
                .with_children([NetworkNode::new("a1")]),
            NetworkNode::new("b").with_active(false),
        ]);
        assert!(root.refresh_active_downline());
        assert!(root.has_active_downline);
        assert!(root.children[0].has_active_downline);
        assert!(!root.children[1].has_active_downline);
        assert!(!root.children[1].is_retained());
    }
}
