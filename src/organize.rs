//! Content organization: document order and section nesting.

use crate::model::{BlockContent, OutlineNode, Section, TypedBlock};

/// Order blocks by source position.
///
/// Positioned blocks are stably sorted ascending; blocks without a position
/// follow them in arrival order.
pub fn order_blocks(blocks: Vec<TypedBlock>) -> Vec<TypedBlock> {
    let (mut positioned, unpositioned): (Vec<_>, Vec<_>) =
        blocks.into_iter().partition(|b| b.position.is_some());
    positioned.sort_by_key(|b| b.position);
    positioned.extend(unpositioned);
    positioned
}

/// Order blocks and nest them into sections.
///
/// Each heading starts a section holding every following non-heading block
/// up to the next heading of any level. Blocks before the first heading stay
/// loose.
pub fn organize(blocks: Vec<TypedBlock>) -> Vec<OutlineNode> {
    let ordered = order_blocks(blocks);
    let nodes = nest(ordered.into_iter().map(OutlineNode::Block));
    log::debug!(
        "organized outline: {} top-level nodes, {} sections",
        nodes.len(),
        nodes.iter().filter(|n| n.as_section().is_some()).count()
    );
    nodes
}

/// Nest an existing outline again.
///
/// Sections are kept as they are and become the current section, so
/// running this on the output of [`organize`] returns it unchanged.
pub fn reorganize(nodes: Vec<OutlineNode>) -> Vec<OutlineNode> {
    nest(nodes.into_iter())
}

fn nest(nodes: impl Iterator<Item = OutlineNode>) -> Vec<OutlineNode> {
    let mut out: Vec<OutlineNode> = Vec::new();

    for node in nodes {
        match node {
            OutlineNode::Section(section) => out.push(OutlineNode::Section(section)),
            OutlineNode::Block(block) => match block.content {
                BlockContent::Heading { text, level } => {
                    let mut section = Section::new(text, level);
                    section.position = block.position;
                    out.push(OutlineNode::Section(section));
                }
                content => {
                    let block = TypedBlock { content, ..block };
                    match out.last_mut() {
                        Some(OutlineNode::Section(section)) => section.content.push(block),
                        _ => out.push(OutlineNode::Block(block)),
                    }
                }
            },
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockKind;

    fn at(block: TypedBlock, position: u64) -> TypedBlock {
        block.with_position(Some(position))
    }

    #[test]
    fn test_order_unpositioned_last() {
        let blocks = vec![
            TypedBlock::paragraph("u1"),
            at(TypedBlock::paragraph("p2"), 2),
            TypedBlock::paragraph("u2"),
            at(TypedBlock::paragraph("p0"), 0),
            at(TypedBlock::paragraph("p2b"), 2),
        ];
        let texts: Vec<String> = order_blocks(blocks)
            .iter()
            .map(|b| b.text().unwrap_or_default().to_string())
            .collect();
        assert_eq!(texts, vec!["p0", "p2", "p2b", "u1", "u2"]);
    }

    #[test]
    fn test_nesting() {
        let blocks = vec![
            at(TypedBlock::paragraph("loose"), 0),
            at(TypedBlock::heading("A", 1), 1),
            at(TypedBlock::paragraph("a1"), 2),
            at(TypedBlock::heading("B", 2), 3),
            at(TypedBlock::table(vec![vec!["x".into()]]), 4),
            at(TypedBlock::image(None), 5),
        ];
        let nodes = organize(blocks);

        assert_eq!(nodes.len(), 3);
        assert!(matches!(&nodes[0], OutlineNode::Block(b) if b.text() == Some("loose")));
        let a = nodes[1].as_section().unwrap();
        assert_eq!(a.title, "A");
        assert_eq!(a.level, 1);
        assert_eq!(a.position, Some(1));
        assert_eq!(a.content.len(), 1);
        let b = nodes[2].as_section().unwrap();
        assert_eq!(b.level, 2);
        let kinds: Vec<BlockKind> = b.content.iter().map(|x| x.kind()).collect();
        assert_eq!(kinds, vec![BlockKind::Table, BlockKind::Image]);
    }

    #[test]
    fn test_interleaves_passes_by_position() {
        // text pass output first, then tables, then images
        let blocks = vec![
            at(TypedBlock::heading("H", 1), 0),
            at(TypedBlock::paragraph("after table"), 3),
            at(TypedBlock::table(vec![vec!["t".into()]]), 1),
            at(TypedBlock::image(None), 2),
        ];
        let nodes = organize(blocks);
        let section = nodes[0].as_section().unwrap();
        let kinds: Vec<BlockKind> = section.content.iter().map(|x| x.kind()).collect();
        assert_eq!(
            kinds,
            vec![BlockKind::Table, BlockKind::Image, BlockKind::Paragraph]
        );
    }

    #[test]
    fn test_reorganize_is_idempotent() {
        let blocks = vec![
            TypedBlock::paragraph("intro"),
            TypedBlock::heading("One", 1),
            TypedBlock::paragraph("body"),
            TypedBlock::formula("x", true, "$x$"),
            TypedBlock::heading("Empty", 2),
            TypedBlock::heading("Two", 1),
            TypedBlock::image(None),
        ];
        let once = organize(blocks);
        let twice = reorganize(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_input() {
        assert!(organize(Vec::new()).is_empty());
    }
}
