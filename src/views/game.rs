//! Game view: the Pong board, animated by a host interval.
//!
//! The interval is the one live resource a view holds; the route's cleanup
//! calls [`GameController::stop`] to release it.

use std::cell::RefCell;
use std::rc::Rc;

use crate::debug::{self, cat};
use crate::game::{self, Pong};
use crate::platform::{Host, IntervalHandle};

pub const BOARD_ID: &str = "game-board";
pub const SCORE_ID: &str = "game-score";
pub const BALL_ID: &str = "game-ball";
pub const LEFT_PADDLE_ID: &str = "paddle-left";
pub const RIGHT_PADDLE_ID: &str = "paddle-right";

/// About 60 frames per second.
pub const FRAME_MILLIS: u32 = 16;

pub fn render() -> String {
    format!(
        r##"
<div class="page game">
  <h2>Pong Game</h2>
  <div id="game-score" class="game-score">0 : 0</div>
  <div id="game-board" class="game-board" style="position: relative; width: {w}px; height: {h}px;">
    <div id="paddle-left" class="paddle" style="position: absolute; left: {m}px; width: {pw}px; height: {ph}px;"></div>
    <div id="paddle-right" class="paddle" style="position: absolute; right: {m}px; width: {pw}px; height: {ph}px;"></div>
    <div id="game-ball" class="ball" style="position: absolute; width: {b}px; height: {b}px;"></div>
  </div>
  <p><a href="#/dashboard">Leave game</a></p>
</div>
"##,
        w = game::WIDTH,
        h = game::HEIGHT,
        m = game::PADDLE_MARGIN,
        pw = game::PADDLE_WIDTH,
        ph = game::PADDLE_HEIGHT,
        b = game::BALL_SIZE,
    )
}

pub struct GameController {
    host: Rc<dyn Host>,
    running: RefCell<Option<IntervalHandle>>,
}

impl GameController {
    pub fn new(host: Rc<dyn Host>) -> Self {
        Self {
            host,
            running: RefCell::new(None),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.borrow().is_some()
    }

    /// Start the loop if the board is mounted. A loop left over from an
    /// earlier mount is replaced, which cancels it.
    pub fn start(&self) -> bool {
        if !self.host.has_element(BOARD_ID) {
            debug::log(cat::GAME, "board not mounted, not starting");
            return false;
        }
        let mut pong = Pong::new();
        draw(self.host.as_ref(), &pong);

        let host = self.host.clone();
        let handle = self.host.start_interval(
            FRAME_MILLIS,
            Box::new(move || {
                if let Some(side) = pong.step() {
                    debug::log(cat::GAME, format!("point {side:?}: {}", pong.score_line()));
                }
                draw(host.as_ref(), &pong);
            }),
        );
        let previous = self.running.borrow_mut().replace(handle);
        drop(previous);
        debug::log(cat::GAME, "loop started");
        true
    }

    pub fn stop(&self) -> anyhow::Result<()> {
        let handle = self.running.borrow_mut().take();
        if handle.is_some() {
            debug::log(cat::GAME, "loop stopped");
        }
        drop(handle);
        Ok(())
    }
}

fn draw(host: &dyn Host, pong: &Pong) {
    host.set_style(BALL_ID, "left", &format!("{}px", pong.ball.x));
    host.set_style(BALL_ID, "top", &format!("{}px", pong.ball.y));
    host.set_style(LEFT_PADDLE_ID, "top", &format!("{}px", pong.left_y));
    host.set_style(RIGHT_PADDLE_ID, "top", &format!("{}px", pong.right_y));
    host.set_text(SCORE_ID, &pong.score_line());
}
