//! Token splicing in the editor offset space.

use crate::model::document::{Block, Document, Inline, TextRun};
use crate::model::variable::VariableDescriptor;
use crate::trigger::ArmedTrigger;
use log::debug;

/// Replaces the trigger range with one atomic variable token.
///
/// The token label is the descriptor's label localized for `lang`. Offsets
/// beyond the document end clamp to it; a range crossing block boundaries
/// merges the first and last block (the first block keeps its kind).
pub fn apply_insertion(
    document: &Document,
    trigger: &ArmedTrigger,
    variable: &VariableDescriptor,
    lang: &str,
) -> Document {
    let token = Inline::variable(variable.key.clone(), variable.localized_label(lang));
    let mut blocks = if document.blocks.is_empty() {
        vec![Block::paragraph(Vec::new())]
    } else {
        document.blocks.clone()
    };

    let total = blocks.iter().map(Block::content_len).sum::<usize>() + blocks.len() - 1;
    let from = trigger.from.min(total);
    let to = trigger.to.clamp(from, total);
    let (start_block, start_local) = locate(&blocks, from);
    let (end_block, end_local) = locate(&blocks, to);

    let mut content = slice_runs(blocks[start_block].content(), 0, start_local);
    content.push(token);
    let tail = &blocks[end_block];
    content.extend(slice_runs(tail.content(), end_local, tail.content_len()));

    let merged = match &blocks[start_block] {
        Block::HorizontalRule => Block::paragraph(content),
        other => {
            let mut block = other.clone();
            if let Some(runs) = block.content_mut() {
                *runs = content;
            }
            block
        }
    };

    blocks.splice(start_block..=end_block, [merged]);
    debug!(
        "event=variable_insert module=editing status=ok key={} from={} to={}",
        variable.key, from, to
    );
    Document::new(blocks)
}

/// Maps an editor offset to `(block index, offset inside the block)`.
fn locate(blocks: &[Block], offset: usize) -> (usize, usize) {
    let mut start = 0;
    for (index, block) in blocks.iter().enumerate() {
        let len = block.content_len();
        if offset <= start + len {
            return (index, offset.saturating_sub(start));
        }
        start += len + 1;
    }
    let last = blocks.len() - 1;
    (last, blocks[last].content_len())
}

/// Copies the runs covering `[start, end)` of a block's content.
///
/// Text runs are cut at character boundaries; tokens are kept whole or
/// dropped since they occupy a single position.
fn slice_runs(content: &[Inline], start: usize, end: usize) -> Vec<Inline> {
    let mut sliced = Vec::new();
    let mut position = 0;
    for inline in content {
        let len = inline.len();
        let run_start = position;
        let run_end = position + len;
        position = run_end;

        let lo = start.max(run_start);
        let hi = end.min(run_end);
        if lo >= hi {
            continue;
        }

        match inline {
            Inline::Variable(_) => sliced.push(inline.clone()),
            Inline::Text(run) => {
                let text: String = run
                    .text
                    .chars()
                    .skip(lo - run_start)
                    .take(hi - lo)
                    .collect();
                sliced.push(Inline::Text(TextRun {
                    text,
                    marks: run.marks,
                }));
            }
        }
    }
    sliced
}
