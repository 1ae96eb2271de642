//! Pong board physics, independent of any rendering.
//!
//! Coordinates are board pixels, origin top-left. Both paddles are driven by
//! a speed-capped tracker.

pub const WIDTH: f32 = 800.0;
pub const HEIGHT: f32 = 500.0;
pub const PADDLE_WIDTH: f32 = 10.0;
pub const PADDLE_HEIGHT: f32 = 80.0;
pub const PADDLE_MARGIN: f32 = 20.0;
pub const PADDLE_SPEED: f32 = 4.0;
pub const BALL_SIZE: f32 = 10.0;
pub const SERVE_SPEED: f32 = 5.0;
pub const MAX_SPEED: f32 = 12.0;
/// Speed gained on every paddle hit. Once the ball outruns the paddles'
/// vertical speed, rallies start ending.
pub const SPEEDUP: f32 = 1.05;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Pong {
    pub ball: Ball,
    /// Top edge of each paddle.
    pub left_y: f32,
    pub right_y: f32,
    pub left_score: u32,
    pub right_score: u32,
}

impl Default for Pong {
    fn default() -> Self {
        Self::new()
    }
}

impl Pong {
    pub fn new() -> Self {
        let paddle_y = (HEIGHT - PADDLE_HEIGHT) / 2.0;
        Self {
            ball: serve(Side::Right),
            left_y: paddle_y,
            right_y: paddle_y,
            left_score: 0,
            right_score: 0,
        }
    }

    pub fn score_line(&self) -> String {
        format!("{} : {}", self.left_score, self.right_score)
    }

    /// Advance one frame. Returns the side that scored, if any.
    pub fn step(&mut self) -> Option<Side> {
        let target = self.ball.y + BALL_SIZE / 2.0 - PADDLE_HEIGHT / 2.0;
        self.left_y = track(self.left_y, target);
        self.right_y = track(self.right_y, target);

        let b = &mut self.ball;
        b.x += b.vx;
        b.y += b.vy;

        if b.y <= 0.0 {
            b.y = 0.0;
            b.vy = b.vy.abs();
        } else if b.y + BALL_SIZE >= HEIGHT {
            b.y = HEIGHT - BALL_SIZE;
            b.vy = -b.vy.abs();
        }

        let left_face = PADDLE_MARGIN + PADDLE_WIDTH;
        let right_face = WIDTH - PADDLE_MARGIN - PADDLE_WIDTH;
        if b.vx < 0.0 && b.x <= left_face && b.x >= PADDLE_MARGIN && overlaps(b.y, self.left_y) {
            b.x = left_face;
            b.vx = (-b.vx * SPEEDUP).min(MAX_SPEED);
            b.vy = speed_up(b.vy);
        } else if b.vx > 0.0
            && b.x + BALL_SIZE >= right_face
            && b.x + BALL_SIZE <= WIDTH - PADDLE_MARGIN
            && overlaps(b.y, self.right_y)
        {
            b.x = right_face - BALL_SIZE;
            b.vx = -(b.vx * SPEEDUP).min(MAX_SPEED);
            b.vy = speed_up(b.vy);
        }

        if self.ball.x + BALL_SIZE < 0.0 {
            self.right_score += 1;
            self.ball = serve(Side::Left);
            Some(Side::Right)
        } else if self.ball.x > WIDTH {
            self.left_score += 1;
            self.ball = serve(Side::Right);
            Some(Side::Left)
        } else {
            None
        }
    }
}

/// Centered ball heading toward `toward`.
fn serve(toward: Side) -> Ball {
    let vx = match toward {
        Side::Left => -SERVE_SPEED,
        Side::Right => SERVE_SPEED,
    };
    Ball {
        x: (WIDTH - BALL_SIZE) / 2.0,
        y: (HEIGHT - BALL_SIZE) / 2.0,
        vx,
        vy: SERVE_SPEED * 0.6,
    }
}

fn speed_up(v: f32) -> f32 {
    (v * SPEEDUP).clamp(-MAX_SPEED, MAX_SPEED)
}

fn track(paddle_y: f32, target: f32) -> f32 {
    let delta = (target - paddle_y).clamp(-PADDLE_SPEED, PADDLE_SPEED);
    (paddle_y + delta).clamp(0.0, HEIGHT - PADDLE_HEIGHT)
}

fn overlaps(ball_y: f32, paddle_y: f32) -> bool {
    ball_y + BALL_SIZE >= paddle_y && ball_y <= paddle_y + PADDLE_HEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ball_bounces_off_top_wall() {
        let mut pong = Pong::new();
        pong.ball = Ball {
            x: 400.0,
            y: 2.0,
            vx: 3.0,
            vy: -5.0,
        };
        pong.step();
        assert_eq!(pong.ball.y, 0.0);
        assert!(pong.ball.vy > 0.0);
    }

    #[test]
    fn paddle_returns_ball_faster() {
        let mut pong = Pong::new();
        pong.left_y = 200.0;
        pong.ball = Ball {
            x: PADDLE_MARGIN + PADDLE_WIDTH + 2.0,
            y: 230.0,
            vx: -5.0,
            vy: 2.0,
        };
        assert_eq!(pong.step(), None);
        assert!(pong.ball.vx > 5.0);
        assert!(pong.ball.vx <= MAX_SPEED);
        assert!(pong.ball.vy > 2.0);
    }

    #[test]
    fn miss_scores_and_reserves_toward_loser() {
        let mut pong = Pong::new();
        pong.left_y = 0.0;
        pong.ball = Ball {
            x: -BALL_SIZE + 1.0,
            y: 450.0,
            vx: -5.0,
            vy: 0.0,
        };
        assert_eq!(pong.step(), Some(Side::Right));
        assert_eq!(pong.right_score, 1);
        assert_eq!(pong.score_line(), "0 : 1");
        assert!(pong.ball.vx < 0.0);
        assert_eq!(pong.ball.x, (WIDTH - BALL_SIZE) / 2.0);
    }

    #[test]
    fn paddles_stay_on_board_and_move_at_capped_speed() {
        assert_eq!(track(0.0, -100.0), 0.0);
        assert_eq!(track(HEIGHT - PADDLE_HEIGHT, 10_000.0), HEIGHT - PADDLE_HEIGHT);
        assert_eq!(track(100.0, 200.0), 100.0 + PADDLE_SPEED);
    }
}
