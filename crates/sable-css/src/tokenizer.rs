//! Token stream with O(1) backtracking over a persistent state chain.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{SourceLocation, SourcePosition};
use crate::lexer::Lexer;
use crate::token::{BlockType, Delimiters, Token};

/// One node of the persistent token chain.
///
/// A node is immutable except for the lazily filled `next` pointer, which is
/// only ever extended forward (append-only). Holding a reference to an old
/// node keeps that suffix of the chain alive, which is the backtracking
/// mechanism: resetting to it is an O(1) pointer copy and is never
/// invalidated by subsequent forward progress.
struct StateNode {
    /// The token consumed to arrive at this node; `None` at end of input.
    /// Unused on the head node.
    token: Option<Token>,
    /// Character offset after the token.
    position: SourcePosition,
    /// Line/column after the token.
    location: SourceLocation,
    /// The next node, filled on first demand.
    next: RefCell<Option<Rc<StateNode>>>,
}

/// An O(1) snapshot of a [`Tokenizer`]'s position.
///
/// Any number of holders may keep old states alive; see [`StateNode`].
#[derive(Clone)]
pub struct State(Rc<StateNode>);

impl State {
    /// Character offset after the last token consumed before the snapshot.
    #[must_use]
    pub fn position(&self) -> SourcePosition {
        self.0.position
    }

    /// Line/column after the last token consumed before the snapshot.
    #[must_use]
    pub fn location(&self) -> SourceLocation {
        self.0.location
    }
}

/// Lexes on demand and records every token in a shared, persistent,
/// singly-forward-linked chain, so that backtracking to any previously
/// visited position and re-reading never re-lexes input.
///
/// Cloning a tokenizer is O(1) and produces an independent cursor over the
/// same chain and the same underlying lexer; this is the fan-out mechanism
/// for scoped sub-parsing. Not safe for concurrent mutation from multiple
/// threads; sharing is single-threaded by design.
pub struct Tokenizer {
    text: Rc<Vec<char>>,
    lexer: Rc<RefCell<Lexer>>,
    state: Rc<StateNode>,
}

impl Clone for Tokenizer {
    fn clone(&self) -> Self {
        Self {
            text: Rc::clone(&self.text),
            lexer: Rc::clone(&self.lexer),
            state: Rc::clone(&self.state),
        }
    }
}

impl Tokenizer {
    /// Create a tokenizer over the given source text.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            text: Rc::new(text.chars().collect()),
            lexer: Rc::new(RefCell::new(Lexer::new(text))),
            state: Rc::new(StateNode {
                token: None,
                position: SourcePosition(0),
                location: SourceLocation { line: 0, column: 0 },
                next: RefCell::new(None),
            }),
        }
    }

    /// The node following `state`, lexing it into existence if the chain
    /// has not been extended this far yet. The lexer always sits at the tip
    /// of the chain, so a missing `next` means `state` is the tip.
    fn materialize_next(&self, state: &Rc<StateNode>) -> Rc<StateNode> {
        if let Some(next) = state.next.borrow().as_ref() {
            return Rc::clone(next);
        }

        let mut lexer = self.lexer.borrow_mut();
        let token = lexer.next_token();
        let node = Rc::new(StateNode {
            token,
            position: lexer.position(),
            location: lexer.location(),
            next: RefCell::new(None),
        });
        *state.next.borrow_mut() = Some(Rc::clone(&node));
        node
    }

    /// Advance one token; `None` signals exhaustion.
    pub fn next_token(&mut self) -> Option<Token> {
        let next = self.materialize_next(&self.state);
        self.state = Rc::clone(&next);
        next.token.clone()
    }

    /// Read the nth token ahead (0 = the token `next_token` would return)
    /// without moving the cursor.
    #[must_use]
    pub fn peek_token(&self, nth: usize) -> Option<Token> {
        let mut node = self.materialize_next(&self.state);
        for _ in 0..nth {
            node = self.materialize_next(&node);
        }
        node.token.clone()
    }

    /// Snapshot the current position. O(1).
    #[must_use]
    pub fn state(&self) -> State {
        State(Rc::clone(&self.state))
    }

    /// Restore a previously captured position. O(1), always safe, and
    /// side-effect-free with respect to any other held snapshot.
    pub fn reset(&mut self, state: &State) {
        self.state = Rc::clone(&state.0);
    }

    /// Character offset after the last consumed token.
    #[must_use]
    pub fn position(&self) -> SourcePosition {
        self.state.position
    }

    /// Line/column after the last consumed token.
    #[must_use]
    pub fn location(&self) -> SourceLocation {
        self.state.location
    }

    /// The raw source text between two positions.
    #[must_use]
    pub fn slice(&self, from: SourcePosition, to: SourcePosition) -> String {
        self.text[from.0..to.0].iter().collect()
    }

    /// The raw source text from `from` to the current position.
    #[must_use]
    pub fn slice_from(&self, from: SourcePosition) -> String {
        self.slice(from, self.position())
    }

    /// Depth-tracked skip to the end of a block of the given type.
    ///
    /// Maintains a stack seeded with `block_type`; every opening token
    /// pushes, every closing token matching the stack top pops, and an
    /// empty stack stops. Tokens in between are ignored. Reaching end of
    /// input before balance is a silent stop: an unterminated block is fine
    /// under lenient CSS error recovery.
    pub fn consume_until_end_of_block(&mut self, block_type: BlockType) {
        let mut stack = vec![block_type];

        while let Some(token) = self.next_token() {
            if let Some(closing) = BlockType::closing(&token) {
                if stack.last() == Some(&closing) {
                    let _ = stack.pop();
                    if stack.is_empty() {
                        return;
                    }
                    continue;
                }
            }
            if let Some(opening) = BlockType::opening(&token) {
                stack.push(opening);
            }
        }
    }

    /// Advance token-by-token, recursively skipping any nested block
    /// encountered, stopping exactly before a token whose delimiter
    /// classification intersects `delimiters`, or at end of input.
    pub fn consume_until_before(&mut self, delimiters: Delimiters) {
        loop {
            let Some(token) = self.peek_token(0) else {
                return;
            };
            if delimiters.includes_token(&token) {
                return;
            }

            let _ = self.next_token();
            if let Some(block_type) = BlockType::opening(&token) {
                self.consume_until_end_of_block(block_type);
            }
        }
    }
}
