//! Ultimate Tic-Tac-Toe game implementation for the search engine
//!
//! The board is a 3x3 grid of ordinary 3x3 Tic-Tac-Toe boards. Playing in
//! cell `c` of any inner board sends the opponent to inner board `c`; if that
//! board is already closed (won or full) the opponent may play in any open
//! board. Winning three inner boards in a line wins the game.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::{Game, PlayerId};
//! use games_ultimate_tictactoe::{Action, State, UltimateTicTacToe};
//!
//! let game = UltimateTicTacToe::new();
//! let state = State::new();
//! assert_eq!(game.legal_actions(&state).len(), 81);
//!
//! let next = game.apply(&state, Action::new(4, 0)).unwrap();
//! assert_eq!(game.current_player(&next), PlayerId::TWO);
//! assert_eq!(next.active_board(), Some(0));
//! ```

use std::fmt;
use std::str::FromStr;

use engine_core::game_utils::{completes_line_at, line_winner};
use engine_core::{Game, GameError, LineGame, Outcome, PlayerId};

/// Inner board status: still playable
pub const BOX_OPEN: u8 = 0;
/// Inner board status: full without a line
pub const BOX_FULL: u8 = 3;

/// Winner indicator value for a drawn game
pub const DRAW: u8 = 3;

/// A move: the inner board (outer cell) and the cell within it, both 0-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Action {
    pub board: u8,
    pub cell: u8,
}

impl Action {
    pub const fn new(board: u8, cell: u8) -> Self {
        Self { board, cell }
    }

    /// Flat index 0-80 (board-major)
    pub fn index(&self) -> usize {
        self.board as usize * 9 + self.cell as usize
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.board, self.cell)
    }
}

/// Error type for parsing `board:cell` move notation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseActionError {
    #[error("Expected `board:cell`, got '{0}'")]
    Malformed(String),
    #[error("Coordinate out of range 0-8 in '{0}'")]
    OutOfRange(String),
}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (board, cell) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| ParseActionError::Malformed(s.to_string()))?;
        let board: u8 = board
            .trim()
            .parse()
            .map_err(|_| ParseActionError::Malformed(s.to_string()))?;
        let cell: u8 = cell
            .trim()
            .parse()
            .map_err(|_| ParseActionError::Malformed(s.to_string()))?;
        if board >= 9 || cell >= 9 {
            return Err(ParseActionError::OutOfRange(s.to_string()));
        }
        Ok(Action::new(board, cell))
    }
}

/// Parse a whitespace- or comma-separated move list such as `"4:0 0:4, 4:8"`.
pub fn parse_moves(input: &str) -> Result<Vec<Action>, ParseActionError> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(str::parse)
        .collect()
}

/// Ultimate Tic-Tac-Toe game state
///
/// Immutable by convention: [`State::make_move`] returns a new state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct State {
    /// Inner boards, `cells[board][cell]`: 0=empty, 1=X, 2=O
    cells: [[u8; 9]; 9],
    /// Inner board status: 0=open, 1=won by X, 2=won by O, 3=full
    boxes: [u8; 9],
    /// Board the next move must be played in, `None` = any open board
    active_board: Option<u8>,
    /// Current player: 1=X, 2=O
    current_player: u8,
    /// Winner: 0=none/ongoing, 1=X, 2=O, 3=draw
    winner: u8,
}

impl State {
    /// Create a new initial game state
    pub fn new() -> Self {
        Self {
            cells: [[0; 9]; 9],
            boxes: [BOX_OPEN; 9],
            active_board: None,
            current_player: 1, // X goes first
            winner: 0,
        }
    }

    /// Build a position from raw cells.
    ///
    /// Inner board statuses and the overall winner are derived from the
    /// cells. `active_board` must name an open inner board or be `None`.
    pub fn from_cells(
        cells: [[u8; 9]; 9],
        current_player: u8,
        active_board: Option<u8>,
    ) -> Result<Self, GameError> {
        if current_player != 1 && current_player != 2 {
            return Err(GameError::InvalidState(format!(
                "Invalid current_player: {}",
                current_player
            )));
        }

        for board in &cells {
            if let Some(&cell) = board.iter().find(|&&cell| cell > 2) {
                return Err(GameError::InvalidState(format!(
                    "Invalid board cell: {}",
                    cell
                )));
            }
        }

        let mut boxes = [BOX_OPEN; 9];
        for (status, board) in boxes.iter_mut().zip(cells.iter()) {
            *status = Self::box_status(board);
        }

        if let Some(board) = active_board {
            if board >= 9 {
                return Err(GameError::InvalidState(format!(
                    "Invalid active board: {}",
                    board
                )));
            }
            if boxes[board as usize] != BOX_OPEN {
                return Err(GameError::InvalidState(format!(
                    "Active board {} is already closed",
                    board
                )));
            }
        }

        Ok(Self {
            cells,
            boxes,
            active_board,
            current_player,
            winner: Self::check_winner(&boxes),
        })
    }

    /// Replay a move list from the initial position.
    pub fn from_moves(moves: &[Action]) -> Result<Self, GameError> {
        moves
            .iter()
            .try_fold(Self::new(), |state, &action| state.make_move(action))
    }

    /// Check if the game is over
    pub fn is_done(&self) -> bool {
        self.winner != 0
    }

    pub fn winner(&self) -> u8 {
        self.winner
    }

    pub fn current_player(&self) -> u8 {
        self.current_player
    }

    pub fn active_board(&self) -> Option<u8> {
        self.active_board
    }

    /// Status of one inner board (0=open, 1=X, 2=O, 3=full)
    pub fn box_status(board: &[u8; 9]) -> u8 {
        match line_winner(board) {
            0 if board.iter().all(|&cell| cell != 0) => BOX_FULL,
            winner => winner,
        }
    }

    /// Status of inner board `board` in this position
    pub fn box_at(&self, board: u8) -> u8 {
        self.boxes[board as usize]
    }

    /// Contents of a single cell
    pub fn cell(&self, board: u8, cell: u8) -> u8 {
        self.cells[board as usize][cell as usize]
    }

    /// Number of marks on the board
    pub fn moves_played(&self) -> usize {
        self.cells
            .iter()
            .map(|board| board.iter().filter(|&&cell| cell != 0).count())
            .sum()
    }

    /// Whether `action` may be played by the player to move
    pub fn is_legal(&self, action: Action) -> bool {
        if self.is_done() || action.board >= 9 || action.cell >= 9 {
            return false;
        }
        if self.active_board.is_some_and(|board| board != action.board) {
            return false;
        }
        self.boxes[action.board as usize] == BOX_OPEN
            && self.cells[action.board as usize][action.cell as usize] == 0
    }

    /// Legal moves ordered by (board, cell)
    pub fn legal_moves(&self) -> Vec<Action> {
        if self.is_done() {
            return Vec::new();
        }

        let boards: Vec<u8> = match self.active_board {
            Some(board) => vec![board],
            None => (0..9u8)
                .filter(|&board| self.boxes[board as usize] == BOX_OPEN)
                .collect(),
        };

        boards
            .into_iter()
            .flat_map(|board| {
                (0..9u8)
                    .filter(move |&cell| self.cells[board as usize][cell as usize] == 0)
                    .map(move |cell| Action::new(board, cell))
            })
            .collect()
    }

    /// Make a move and return the new state
    pub fn make_move(&self, action: Action) -> Result<State, GameError> {
        if !self.is_legal(action) {
            return Err(GameError::illegal(&action));
        }

        let board = action.board as usize;
        let mut new_state = *self;
        new_state.cells[board][action.cell as usize] = self.current_player;
        new_state.boxes[board] = Self::box_status(&new_state.cells[board]);
        new_state.winner = Self::check_winner(&new_state.boxes);

        // The opponent is sent to the board matching the cell just played
        new_state.active_board = if new_state.boxes[action.cell as usize] == BOX_OPEN {
            Some(action.cell)
        } else {
            None
        };

        // Switch player if game not over
        if new_state.winner == 0 {
            new_state.current_player = if self.current_player == 1 { 2 } else { 1 };
        }

        Ok(new_state)
    }

    /// Check for a winner on the outer board
    fn check_winner(boxes: &[u8; 9]) -> u8 {
        let mut outer = [0u8; 9];
        for (slot, &status) in outer.iter_mut().zip(boxes.iter()) {
            if status == 1 || status == 2 {
                *slot = status;
            }
        }

        match line_winner(&outer) {
            0 if boxes.iter().all(|&status| status != BOX_OPEN) => DRAW,
            winner => winner,
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// Ultimate Tic-Tac-Toe game implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct UltimateTicTacToe;

impl UltimateTicTacToe {
    /// Create a new Ultimate Tic-Tac-Toe game
    pub fn new() -> Self {
        Self
    }
}

impl Game for UltimateTicTacToe {
    type State = State;
    type Action = Action;

    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action> {
        state.legal_moves()
    }

    fn apply(&self, state: &Self::State, action: Self::Action) -> Result<Self::State, GameError> {
        state.make_move(action)
    }

    fn is_terminal(&self, state: &Self::State) -> bool {
        state.is_done()
    }

    fn outcome(&self, state: &Self::State, player: PlayerId) -> Result<Outcome, GameError> {
        if !state.is_done() {
            return Err(GameError::NotTerminal);
        }
        Ok(Outcome::from_winner(state.winner, player))
    }

    fn current_player(&self, state: &Self::State) -> PlayerId {
        PlayerId(state.current_player)
    }
}

impl LineGame for UltimateTicTacToe {
    fn completes_line(&self, state: &Self::State, action: Self::Action, player: PlayerId) -> bool {
        if action.board >= 9 || state.boxes[action.board as usize] != BOX_OPEN {
            return false;
        }
        // A completed outer line always runs through a freshly won inner
        // board, so the inner check covers both.
        completes_line_at(
            &state.cells[action.board as usize],
            action.cell as usize,
            player.0,
        )
    }
}
