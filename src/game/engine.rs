use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::Rng;

use super::{
    config::GameConfig,
    direction::Direction,
    state::{GameOverReason, GameState, Position, Snake},
};

/// Outcome of one simulation tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The snake moved one cell without eating
    Moved,
    /// The snake moved onto the food and grew by one segment
    AteFood,
    /// The game ended this tick (or had ended on an earlier one)
    GameOver(GameOverReason),
}

impl TickOutcome {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TickOutcome::GameOver(_))
    }
}

/// Uniform draws attempted before enumerating free cells outright
const FOOD_SAMPLE_ATTEMPTS: usize = 100;

/// The game engine that handles all simulation logic
///
/// Holds the configuration and the random source for food placement; the
/// mutable simulation state itself lives in a [`GameState`] value passed to
/// every call, so tests can drive ticks directly without a timer.
pub struct GameEngine<R: Rng = ThreadRng> {
    config: GameConfig,
    rng: R,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        GameEngine::with_rng(config, rand::thread_rng())
    }
}

impl<R: Rng> GameEngine<R> {
    /// Create an engine with an explicit random source, for deterministic tests
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Reset the simulation to its initial state
    pub fn reset(&mut self) -> GameState {
        let center = (self.config.grid_size / 2) as i32;

        let snake = Snake::new(
            Position::new(center, center),
            Direction::Right,
            self.config.initial_snake_length,
        );

        let food = self
            .spawn_food(&snake)
            .expect("initial snake fills the whole grid");

        GameState::new(
            snake,
            food,
            self.config.grid_size,
            self.config.initial_tick_ms,
        )
    }

    /// Buffer a turn to be applied on an upcoming tick
    ///
    /// The turn is silently dropped if it reverses the last intended direction
    /// (the newest queued turn, or the current heading when nothing is queued)
    /// or if the buffer is already full. Filtering against the last *intended*
    /// direction lets a player queue several turns within one tick interval
    /// without being able to double back into the snake's own neck.
    pub fn enqueue_direction(&self, state: &mut GameState, direction: Direction) {
        if state.queued_turns.len() >= self.config.max_queued_turns {
            return;
        }
        if direction.is_opposite(state.last_intended_direction()) {
            return;
        }
        state.queued_turns.push_back(direction);
    }

    /// Advance the simulation by one tick
    ///
    /// Collision checks run against the pre-move body: the tail cell counts as
    /// occupied because it only vacates once the tick has resolved. A tick on
    /// an already-ended game reports the terminal outcome again and changes
    /// nothing.
    pub fn tick(&mut self, state: &mut GameState) -> TickOutcome {
        if let Some(reason) = state.over {
            return TickOutcome::GameOver(reason);
        }

        if let Some(turn) = state.queued_turns.pop_front() {
            state.snake.direction = turn;
        }

        let new_head = state.snake.head().moved_in_direction(state.snake.direction);

        if !state.is_in_bounds(new_head) {
            state.over = Some(GameOverReason::WallCollision);
            return TickOutcome::GameOver(GameOverReason::WallCollision);
        }

        if state.snake.collides_with_body(new_head) {
            state.over = Some(GameOverReason::SelfCollision);
            return TickOutcome::GameOver(GameOverReason::SelfCollision);
        }

        let ate_food = new_head == state.food;
        state.snake = state.snake.advance(ate_food);
        state.steps += 1;

        if !ate_food {
            return TickOutcome::Moved;
        }

        state.score += 1;
        state.tick_ms = state
            .tick_ms
            .saturating_sub(self.config.tick_decrement_ms)
            .max(self.config.min_tick_ms);

        match self.spawn_food(&state.snake) {
            Some(food) => {
                state.food = food;
                TickOutcome::AteFood
            }
            None => {
                state.over = Some(GameOverReason::BoardFull);
                TickOutcome::GameOver(GameOverReason::BoardFull)
            }
        }
    }

    /// Pick a food cell not occupied by the snake
    ///
    /// Rejection sampling has O(1) expected cost while the board is mostly
    /// empty; once the attempts are exhausted the free cells are enumerated
    /// and one is chosen uniformly, so placement terminates on a dense board.
    /// Returns `None` when the snake covers the whole grid.
    fn spawn_food(&mut self, snake: &Snake) -> Option<Position> {
        let size = self.config.grid_size as i32;

        for _ in 0..FOOD_SAMPLE_ATTEMPTS {
            let pos = Position::new(self.rng.gen_range(0..size), self.rng.gen_range(0..size));
            if !snake.contains(pos) {
                return Some(pos);
            }
        }

        let free: Vec<Position> = (0..size)
            .flat_map(|y| (0..size).map(move |x| Position::new(x, y)))
            .filter(|pos| !snake.contains(*pos))
            .collect();
        free.choose(&mut self.rng).copied()
    }
}
