// service/binary_tree.rs
use crate::models::binarymodel::{BinaryNode, NodePosition, TeamMember};

/// A node reached by [`pre_order`], with the index of its parent in the
/// walk. Parents always come before their children.
struct Walked<'a> {
    node: &'a BinaryNode,
    parent: Option<usize>,
    position: NodePosition,
    level: u32,
}

/// Pre-order walk, left before right, on an explicit stack so tree depth
/// never touches the call stack.
fn pre_order(start: &BinaryNode, position: NodePosition, level: u32) -> Vec<Walked<'_>> {
    let mut walked = Vec::new();
    let mut stack = vec![(start, None, position, level)];

    while let Some((node, parent, position, level)) = stack.pop() {
        let index = walked.len();
        walked.push(Walked {
            node,
            parent,
            position,
            level,
        });
        if let Some(right) = &node.children.right {
            stack.push((&**right, Some(index), NodePosition::Right, level + 1));
        }
        if let Some(left) = &node.children.left {
            stack.push((&**left, Some(index), NodePosition::Left, level + 1));
        }
    }
    walked
}

/// Every node below `node`, not counting `node` itself.
pub fn count_descendants(node: &BinaryNode) -> u32 {
    pre_order(node, NodePosition::Root, 0).len().saturating_sub(1) as u32
}

/// Flattens the tree in pre-order, left before right. The root is the
/// distributor themself and is never listed.
pub fn extract_team_members(root: Option<&BinaryNode>) -> Vec<TeamMember> {
    let mut members = Vec::new();
    if let Some(root) = root {
        if let Some(left) = &root.children.left {
            members.extend(collect_members(left, NodePosition::Left));
        }
        if let Some(right) = &root.children.right {
            members.extend(collect_members(right, NodePosition::Right));
        }
    }
    members
}

/// Members on one leg of the root only.
pub fn members_on_side(root: Option<&BinaryNode>, side: NodePosition) -> Vec<TeamMember> {
    let child = root.and_then(|root| match side {
        NodePosition::Left => root.children.left.as_deref(),
        NodePosition::Right => root.children.right.as_deref(),
        NodePosition::Root => None,
    });
    child.map(|child| collect_members(child, side)).unwrap_or_default()
}

/// Lists a first-level child and everything under it. Referral counts are
/// summed bottom-up in one reverse pass over the walk.
fn collect_members(child: &BinaryNode, position: NodePosition) -> Vec<TeamMember> {
    let walked = pre_order(child, position, 1);

    let mut referrals = vec![0u32; walked.len()];
    for index in (0..walked.len()).rev() {
        if let Some(parent) = walked[index].parent {
            referrals[parent] += referrals[index] + 1;
        }
    }

    walked
        .into_iter()
        .zip(referrals)
        .map(|(entry, referrals)| TeamMember {
            id: entry.node.id.clone(),
            name: entry.node.name.clone(),
            user_id: entry.node.user_id.clone(),
            position: entry.position,
            level: entry.level,
            referrals,
            pv: entry.node.pv,
            is_active: entry.node.is_active,
            joined_at: entry.node.joined_at,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct SideTotals {
    pub left_count: u32,
    pub right_count: u32,
    pub left_pv: f64,
    pub right_pv: f64,
}

impl SideTotals {
    pub fn weaker_side_pv(&self) -> f64 {
        self.left_pv.min(self.right_pv)
    }
}


/// Member count and PV on each leg of the root.
pub fn side_totals(root: Option<&BinaryNode>) -> SideTotals {
    let Some(root) = root else {
        return SideTotals::default();
    };
    let side = |child: &Option<Box<BinaryNode>>| match child {
        Some(node) => {
            let walked = pre_order(node, NodePosition::Root, 0);
            (walked.len() as u32, walked.iter().map(|entry| entry.node.pv).sum())
        }
        None => (0, 0.0),
    };
    let (left_count, left_pv) = side(&root.children.left);
    let (right_count, right_pv) = side(&root.children.right);

    SideTotals {
        left_count,
        right_count,
        left_pv,
        right_pv,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::binarymodel::BinaryChildren;

    fn node(id: &str, pv: f64, left: Option<BinaryNode>, right: Option<BinaryNode>) -> BinaryNode {
        BinaryNode {
            id: id.to_string(),
            name: id.to_uppercase(),
            pv,
            is_active: true,
            children: BinaryChildren {
                left: left.map(Box::new),
                right: right.map(Box::new),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_root_is_not_a_member() {
        let root = node("root", 0.0, None, None);
        assert!(extract_team_members(Some(&root)).is_empty());
        assert!(extract_team_members(None).is_empty());
    }

    #[test]
    fn test_left_chain_with_right_grandchild() {
        let b = node("b", 300.0, None, None);
        let a = node("a", 500.0, None, Some(b));
        let root = node("root", 0.0, Some(a), None);

        let members = extract_team_members(Some(&root));
        assert_eq!(members.len(), 2);

        assert_eq!(members[0].id, "a");
        assert_eq!(members[0].level, 1);
        assert_eq!(members[0].position, NodePosition::Left);
        assert_eq!(members[0].referrals, 1);

        assert_eq!(members[1].id, "b");
        assert_eq!(members[1].level, 2);
        assert_eq!(members[1].position, NodePosition::Right);
        assert_eq!(members[1].referrals, 0);
    }

    #[test]
    fn test_pre_order_visits_left_subtree_first() {
        let root = node(
            "root",
            0.0,
            Some(node("l", 1.0, Some(node("ll", 1.0, None, None)), Some(node("lr", 1.0, None, None)))),
            Some(node("r", 1.0, Some(node("rl", 1.0, None, None)), None)),
        );
        let ids: Vec<String> = extract_team_members(Some(&root)).into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["l", "ll", "lr", "r", "rl"]);
    }

    #[test]
    fn test_members_on_one_side() {
        let root = node(
            "root",
            0.0,
            Some(node("l", 1.0, None, Some(node("lr", 1.0, None, None)))),
            Some(node("r", 1.0, Some(node("rl", 1.0, None, None)), None)),
        );
        let ids: Vec<String> = members_on_side(Some(&root), NodePosition::Right)
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["r", "rl"]);
        assert!(members_on_side(Some(&root), NodePosition::Root).is_empty());
    }

    #[test]
    fn test_referrals_count_whole_subtree() {
        let deep = node("l", 0.0, Some(node("ll", 0.0, Some(node("lll", 0.0, None, None)), None)), None);
        assert_eq!(count_descendants(&deep), 2);
    }

    fn left_chain(depth: usize) -> BinaryNode {
        let mut chain: Option<BinaryNode> = None;
        for i in (0..depth).rev() {
            chain = Some(node(&format!("n{}", i), 1.0, chain, None));
        }
        node("root", 0.0, chain, None)
    }

    #[test]
    fn test_deep_left_chain() {
        let root = left_chain(2_000);

        let members = extract_team_members(Some(&root));
        assert_eq!(members.len(), 2_000);
        assert_eq!(members[0].id, "n0");
        assert_eq!(members[0].referrals, 1_999);
        assert_eq!(members[1_999].level, 2_000);
        assert_eq!(members[1_999].referrals, 0);
        assert!(members.iter().all(|m| m.position == NodePosition::Left));

        assert_eq!(count_descendants(&root), 2_000);
        let totals = side_totals(Some(&root));
        assert_eq!(totals.left_count, 2_000);
        assert_eq!(totals.left_pv, 2_000.0);
    }

    #[test]
    fn test_referrals_in_a_branching_tree() {
        let root = node(
            "root",
            0.0,
            Some(node(
                "l",
                0.0,
                Some(node("ll", 0.0, Some(node("lll", 0.0, None, None)), None)),
                Some(node("lr", 0.0, None, None)),
            )),
            Some(node("r", 0.0, None, Some(node("rr", 0.0, None, None)))),
        );
        let referrals: Vec<(String, u32)> = extract_team_members(Some(&root))
            .into_iter()
            .map(|m| (m.id, m.referrals))
            .collect();
        assert_eq!(
            referrals,
            vec![
                ("l".to_string(), 3),
                ("ll".to_string(), 1),
                ("lll".to_string(), 0),
                ("lr".to_string(), 0),
                ("r".to_string(), 1),
                ("rr".to_string(), 0),
            ]
        );
    }

    #[test]
    fn test_side_totals() {
        let root = node(
            "root",
            10.0,
            Some(node("l", 100.0, Some(node("ll", 50.0, None, None)), None)),
            Some(node("r", 80.0, None, None)),
        );
        let totals = side_totals(Some(&root));
        assert_eq!(totals.left_count, 2);
        assert_eq!(totals.right_count, 1);
        assert_eq!(totals.left_pv, 150.0);
        assert_eq!(totals.weaker_side_pv(), 80.0);
    }
}
