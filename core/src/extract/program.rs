//! Program export state machine.
//!
//! A single pass over the program export keeps at most one open block.
//! Every step is the pure function [`transition`], which maps the current
//! [`BlockState`] and a classified [`LineEvent`] to the lines it emits and the
//! next state. Flushing at end of input goes through [`finish`].

use log::debug;

use crate::chip::ChipProfile;
use crate::extract::block::{BlockKind, DataBlock};
use crate::prelude::{ExtractionStage, StageError, StageInput, StageOutput, StageResult};
use crate::text::hex::format_word;
use crate::text::lines::{classify, Declaration, LineEvent};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BlockState {
    #[default]
    Idle,
    Open(DataBlock),
}

/// Result of feeding one event to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub emitted: Vec<String>,
    pub next: BlockState,
    pub opened: Option<BlockKind>,
    pub closed: Option<BlockKind>,
    /// A data line arrived with no block open and was dropped.
    pub orphaned: bool,
}

impl Transition {
    fn stay(state: BlockState, emitted: Vec<String>) -> Self {
        Self {
            emitted,
            next: state,
            opened: None,
            closed: None,
            orphaned: false,
        }
    }
}

fn declaration_lines(declaration: Declaration, value: &str, profile: &ChipProfile) -> Vec<String> {
    match declaration {
        Declaration::ProgramSize => vec![format!("#define PROGRAM_SIZE {}", value)],
        Declaration::ProgramAddr => vec![
            format!("#define PROGRAM_ADDR {}", value),
            format!("#define PROGRAM_REGSIZE {}", profile.program_regsize),
        ],
        Declaration::ParamSize => vec![format!("#define PARAMETER_SIZE {}", value)],
        Declaration::ParamAddr => vec![
            format!("#define PARAMETER_ADDR {}", value),
            format!("#define PARAMETER_REGSIZE {}", profile.parameter_regsize),
        ],
        Declaration::HardwareConfSize => vec![
            format!("#define HARDWARE_CONF_SIZE {}", value),
            format!(
                "#define HARDWARE_CONF_ADDR {}",
                format_word(profile.hardware_conf_addr)
            ),
            format!(
                "#define HARDWARE_CONF_REGSIZE {}",
                profile.hardware_conf_regsize
            ),
            String::new(),
        ],
    }
}

pub fn transition(state: BlockState, event: LineEvent<'_>, profile: &ChipProfile) -> Transition {
    match (state, event) {
        (state, LineEvent::Ignored) => Transition::stay(state, Vec::new()),
        (state, LineEvent::Declaration(declaration, value)) => {
            Transition::stay(state, declaration_lines(declaration, value, profile))
        }
        (state, LineEvent::BlockStart(kind)) => {
            let (mut emitted, closed) = match state {
                BlockState::Open(block) => {
                    let closed_kind = block.kind;
                    (block.close(), Some(closed_kind))
                }
                BlockState::Idle => (Vec::new(), None),
            };
            emitted.extend(kind.companion_defines(profile));
            emitted.push(kind.declaration());
            Transition {
                emitted,
                next: BlockState::Open(DataBlock::new(kind)),
                opened: Some(kind),
                closed,
                orphaned: false,
            }
        }
        (BlockState::Open(mut block), LineEvent::Data(line)) => {
            block.push(line);
            Transition::stay(BlockState::Open(block), Vec::new())
        }
        (BlockState::Idle, LineEvent::Data(_)) => Transition {
            orphaned: true,
            ..Transition::stay(BlockState::Idle, Vec::new())
        },
        (BlockState::Open(block), LineEvent::Terminator) => {
            let kind = block.kind;
            Transition {
                emitted: block.close(),
                next: BlockState::Idle,
                opened: None,
                closed: Some(kind),
                orphaned: false,
            }
        }
        (BlockState::Idle, LineEvent::Terminator) => Transition::stay(BlockState::Idle, Vec::new()),
    }
}

/// Closes a block left open at end of input.
pub fn finish(state: BlockState) -> Transition {
    match state {
        BlockState::Open(block) => {
            let kind = block.kind;
            Transition {
                emitted: block.close(),
                next: BlockState::Idle,
                opened: None,
                closed: Some(kind),
                orphaned: false,
            }
        }
        BlockState::Idle => Transition::stay(BlockState::Idle, Vec::new()),
    }
}

/// Segments the program export into normalized declarations and blocks.
pub fn extract_program_data(program: &str, profile: &ChipProfile) -> StageOutput {
    let mut output = StageOutput::default();
    let mut orphaned = 0usize;
    let mut state = BlockState::Idle;

    let mut apply = |step: Transition, output: &mut StageOutput| {
        if step.opened.is_some() {
            output.metadata.blocks_opened += 1;
        }
        if step.closed.is_some() {
            output.metadata.blocks_closed += 1;
        }
        if step.orphaned {
            orphaned += 1;
        }
        output.lines.extend(step.emitted);
        step.next
    };

    for raw in program.lines() {
        let line = raw.trim();
        let event = classify(line);
        if let LineEvent::Data(_) = event {
            if let BlockState::Open(_) = state {
                output.metadata.data_lines += 1;
            }
        }
        state = apply(transition(state, event, profile), &mut output);
    }
    let _ = apply(finish(state), &mut output);

    if orphaned > 0 {
        debug!("discarded {} data line(s) outside any block", orphaned);
        output
            .metadata
            .notes
            .push(format!("{} orphaned data line(s) discarded", orphaned));
    }
    output
}

pub struct ProgramDataStage;

impl ExtractionStage for ProgramDataStage {
    fn name(&self) -> &'static str {
        "program-data"
    }

    fn execute(&self, input: &StageInput<'_>) -> StageResult<StageOutput> {
        let output = extract_program_data(input.program, input.profile);
        let blocks_opened = output.metadata.blocks_opened;
        let blocks_closed = output.metadata.blocks_closed;
        if blocks_opened != blocks_closed {
            return Err(StageError::Internal(format!(
                "{} block(s) opened but {} closed",
                blocks_opened, blocks_closed
            )));
        }
        Ok(output)
    }
}
