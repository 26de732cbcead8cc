//! Static block layout for the Transformer diagram.
//!
//! Two mirrored stacks (encoder left, decoder right) of labeled 3D blocks,
//! generated once at first access and immutable afterwards. The rendering
//! engine consumes these descriptors verbatim; nothing here depends on it.

pub mod palette;

use std::sync::OnceLock;

use serde::Serialize;

use palette::Color;

/// Horizontal distance of each stack from the diagram center.
const STACK_OFFSET_X: f32 = 4.5;
/// Vertical cursor origin: bottom of both stacks.
const BASE_Y: f32 = -6.0;
/// Spacing between consecutive blocks within a stack.
const BLOCK_GAP: f32 = 0.35;
/// Extra spacing between logical sections (embedding vs. layers vs. head).
const SECTION_GAP: f32 = 0.9;
/// All blocks share the same footprint; only height varies.
const BLOCK_WIDTH: f32 = 4.0;
const BLOCK_DEPTH: f32 = 2.2;

const PLACEHOLDER_HEIGHT: f32 = 0.6;
const EMBEDDING_HEIGHT: f32 = 0.8;
const MECHANISM_HEIGHT: f32 = 1.1;
const NORM_HEIGHT: f32 = 0.5;
const HEAD_HEIGHT: f32 = 0.7;

/// Point in diagram space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Axis-aligned extents of a block volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extents {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

/// Semantic role of a block. Informational only; no behavior keys off it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Input,
    Layer,
    Mechanism,
    Output,
}

/// Which of the two mirrored stacks a block belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StackKind {
    Encoder,
    Decoder,
}

impl StackKind {
    fn prefix(self) -> &'static str {
        match self {
            StackKind::Encoder => "Encoder",
            StackKind::Decoder => "Decoder",
        }
    }
}

/// One labeled 3D volume in the diagram.
///
/// `id` is unique across the whole diagram and stable for the lifetime of
/// the view; the shell uses it to route clicks back into the selection
/// model. `position` is the block's center.
#[derive(Debug, Clone, Serialize)]
pub struct Block {
    pub id: String,
    pub label: String,
    pub category: Category,
    pub position: Vec3,
    pub size: Extents,
    pub color: Color,
}

/// Blueprint for one block within a stack, before placement.
struct BlockSpec {
    slug: &'static str,
    label: &'static str,
    category: Category,
    height: f32,
    color: Color,
}

/// A stack is a sequence of blocks with occasional extra vertical gaps.
enum Piece {
    Block(BlockSpec),
    Gap(f32),
}

fn block(
    slug: &'static str,
    label: &'static str,
    category: Category,
    height: f32,
    color: Color,
) -> Piece {
    Piece::Block(BlockSpec {
        slug,
        label,
        category,
        height,
        color,
    })
}

fn residual_norm(slug: &'static str) -> Piece {
    block(slug, "Add & Norm", Category::Layer, NORM_HEIGHT, palette::RESIDUAL_NORM)
}

/// Bottom-to-top block sequence for one stack. Fixed; not configurable at
/// runtime.
fn stack_pieces(kind: StackKind) -> Vec<Piece> {
    let mut pieces = Vec::new();

    match kind {
        StackKind::Encoder => {
            pieces.push(block("inputs", "Inputs", Category::Input, PLACEHOLDER_HEIGHT, palette::PLACEHOLDER));
            pieces.push(block("embedding", "Input Embedding", Category::Layer, EMBEDDING_HEIGHT, palette::EMBEDDING));
            pieces.push(block("positional", "Positional Encoding", Category::Layer, EMBEDDING_HEIGHT, palette::POSITIONAL));
            pieces.push(Piece::Gap(SECTION_GAP));
            pieces.push(block("attention", "Multi-Head Self-Attention", Category::Mechanism, MECHANISM_HEIGHT, palette::ATTENTION));
            pieces.push(residual_norm("attention-norm"));
            pieces.push(block("ffn", "Feed Forward", Category::Mechanism, MECHANISM_HEIGHT, palette::FEED_FORWARD));
            pieces.push(residual_norm("ffn-norm"));
        }
        StackKind::Decoder => {
            pieces.push(block("outputs", "Outputs (shifted right)", Category::Input, PLACEHOLDER_HEIGHT, palette::PLACEHOLDER));
            pieces.push(block("embedding", "Output Embedding", Category::Layer, EMBEDDING_HEIGHT, palette::EMBEDDING));
            pieces.push(block("positional", "Positional Encoding", Category::Layer, EMBEDDING_HEIGHT, palette::POSITIONAL));
            pieces.push(Piece::Gap(SECTION_GAP));
            pieces.push(block("masked-attention", "Masked Multi-Head Self-Attention", Category::Mechanism, MECHANISM_HEIGHT, palette::ATTENTION));
            pieces.push(residual_norm("masked-attention-norm"));
            pieces.push(block("attention", "Multi-Head Cross-Attention", Category::Mechanism, MECHANISM_HEIGHT, palette::ATTENTION));
            pieces.push(residual_norm("attention-norm"));
            pieces.push(block("ffn", "Feed Forward", Category::Mechanism, MECHANISM_HEIGHT, palette::FEED_FORWARD));
            pieces.push(residual_norm("ffn-norm"));
            pieces.push(Piece::Gap(SECTION_GAP));
            pieces.push(block("linear", "Linear", Category::Output, HEAD_HEIGHT, palette::LINEAR));
            pieces.push(block("softmax", "Softmax", Category::Output, HEAD_HEIGHT, palette::SOFTMAX));
            pieces.push(block("probabilities", "Output Probabilities", Category::Output, PLACEHOLDER_HEIGHT, palette::OUTPUT));
        }
    }

    pieces
}

/// Generate one stack of placed blocks at the given horizontal offset.
///
/// Pure and deterministic: a vertical cursor starts at [`BASE_Y`]; each
/// block is centered on the cursor plus half its height, then the cursor
/// advances by the block height plus [`BLOCK_GAP`].
pub fn generate_stack(offset: f32, kind: StackKind) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut cursor = BASE_Y;

    for piece in stack_pieces(kind) {
        match piece {
            Piece::Gap(extra) => cursor += extra,
            Piece::Block(spec) => {
                blocks.push(Block {
                    id: format!("{}-{}", kind.prefix(), spec.slug),
                    label: spec.label.to_string(),
                    category: spec.category,
                    position: Vec3 {
                        x: offset,
                        y: cursor + spec.height / 2.0,
                        z: 0.0,
                    },
                    size: Extents {
                        width: BLOCK_WIDTH,
                        height: spec.height,
                        depth: BLOCK_DEPTH,
                    },
                    color: spec.color,
                });
                cursor += spec.height + BLOCK_GAP;
            }
        }
    }

    blocks
}

/// The full diagram: encoder stack mirrored left, decoder stack right,
/// concatenated. Computed once and never again.
pub fn diagram() -> &'static [Block] {
    static DIAGRAM: OnceLock<Vec<Block>> = OnceLock::new();
    DIAGRAM.get_or_init(|| {
        let mut blocks = generate_stack(-STACK_OFFSET_X, StackKind::Encoder);
        blocks.extend(generate_stack(STACK_OFFSET_X, StackKind::Decoder));
        blocks
    })
}

/// Look up a block by id in the full diagram.
pub fn find(id: &str) -> Option<&'static Block> {
    diagram().iter().find(|b| b.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn identities_are_pairwise_distinct() {
        let ids: HashSet<&str> = diagram().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids.len(), diagram().len());
    }

    #[test]
    fn encoder_and_decoder_never_share_an_identity() {
        let encoder = generate_stack(-STACK_OFFSET_X, StackKind::Encoder);
        let decoder = generate_stack(STACK_OFFSET_X, StackKind::Decoder);
        for b in &encoder {
            for b2 in &decoder {
                assert_ne!(b.id, b2.id);
            }
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let a = generate_stack(-STACK_OFFSET_X, StackKind::Decoder);
        let b = generate_stack(-STACK_OFFSET_X, StackKind::Decoder);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.label, y.label);
            assert_eq!(x.position, y.position);
            assert_eq!(x.size, y.size);
            assert_eq!(x.color, y.color);
        }
    }

    #[test]
    fn stacks_are_mirrored_horizontally() {
        let encoder: Vec<f32> = diagram()
            .iter()
            .filter(|b| b.id.starts_with("Encoder-"))
            .map(|b| b.position.x)
            .collect();
        let decoder: Vec<f32> = diagram()
            .iter()
            .filter(|b| b.id.starts_with("Decoder-"))
            .map(|b| b.position.x)
            .collect();
        assert!(encoder.iter().all(|&x| x == -STACK_OFFSET_X));
        assert!(decoder.iter().all(|&x| x == STACK_OFFSET_X));
        assert_eq!(encoder.len(), 8);
        assert_eq!(decoder.len(), 13);
    }

    #[test]
    fn blocks_ascend_without_overlap() {
        let stack = generate_stack(0.0, StackKind::Decoder);
        for pair in stack.windows(2) {
            let top_of_lower = pair[0].position.y + pair[0].size.height / 2.0;
            let bottom_of_upper = pair[1].position.y - pair[1].size.height / 2.0;
            assert!(bottom_of_upper > top_of_lower);
        }
    }

    #[test]
    fn residual_norm_blocks_share_a_color() {
        let norms: Vec<&Block> = diagram()
            .iter()
            .filter(|b| b.label == "Add & Norm")
            .collect();
        assert_eq!(norms.len(), 5);
        assert!(norms.iter().all(|b| b.color == palette::RESIDUAL_NORM));
    }

    #[test]
    fn find_resolves_known_ids_only() {
        assert!(find("Encoder-attention").is_some());
        assert!(find("Decoder-softmax").is_some());
        assert!(find("Encoder-softmax").is_none());
        assert!(find("nope").is_none());
    }
}
