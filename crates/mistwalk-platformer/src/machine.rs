//! The 12-state movement machine.
//!
//! Each tick: reset the flag bundle from the current state's assumptions,
//! run that state's condition checks in order, integrate and resolve
//! collisions, check for ledges and walls, then pick the next state with a
//! first-match decision tree.

use mistwalk_core::geometry::{Rect, Vec2};
use mistwalk_core::input::InputSnapshot;

use crate::body::PlayerBody;
use crate::collision::{self, Contact};
use crate::config::MovementConfig;
use crate::motion::{self, Regime};
use crate::state::{BehaviorFlags, PlayerState, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Check {
    Accelerate(Regime),
    RunAbility,
    Jump,
    DoubleJump,
    WallJump,
    Crouch,
    Friction,
    Gravity,
}

/// What happens to position after the checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Motion {
    /// No integration unless an external force is applied.
    Hold,
    Grounded,
    GroundedAtWall,
    Airborne,
}

use Check::*;

const IDLE: &[Check] = &[Accelerate(Regime::Walk), Jump, Crouch];
const WALKING: &[Check] = &[Accelerate(Regime::Walk), RunAbility, Jump, Crouch, Friction];
const RUNNING: &[Check] = &[Accelerate(Regime::Run), RunAbility, Jump, Crouch, Friction];
const AIRBORNE: &[Check] = &[Accelerate(Regime::Air), RunAbility, Gravity];
const FALLING: &[Check] = &[Accelerate(Regime::Air), RunAbility, DoubleJump, Gravity];
const WALL_FALLING: &[Check] = &[
    Accelerate(Regime::Air),
    RunAbility,
    WallJump,
    DoubleJump,
    Gravity,
];
const LANDING: &[Check] = &[Accelerate(Regime::Walk), Friction];
const CROUCHING: &[Check] = &[Crouch, Friction];
const AT_WALL: &[Check] = &[Accelerate(Regime::Walk), Jump, Crouch, Friction];

fn script(state: PlayerState) -> (&'static [Check], Motion) {
    match state {
        PlayerState::Idle => (IDLE, Motion::Hold),
        PlayerState::Walking | PlayerState::Sliding => (WALKING, Motion::Grounded),
        PlayerState::Running => (RUNNING, Motion::Grounded),
        PlayerState::Jumping | PlayerState::DoubleJumping | PlayerState::WallJumping { .. } => {
            (AIRBORNE, Motion::Airborne)
        },
        PlayerState::Falling => (FALLING, Motion::Airborne),
        PlayerState::WallFalling => (WALL_FALLING, Motion::Airborne),
        PlayerState::Landing => (LANDING, Motion::Grounded),
        PlayerState::Crouching => (CROUCHING, Motion::Grounded),
        PlayerState::AtWall => (AT_WALL, Motion::GroundedAtWall),
    }
}

/// What one tick did, for event reporting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    pub previous: PlayerState,
    pub contact: Contact,
    /// Side of the wall launched from, if a wall jump fired this tick.
    pub wall_jumped: Option<Side>,
}

impl TickOutcome {
    pub fn landed(&self) -> bool {
        self.contact == Contact::Floor
    }
}

impl PlayerBody {
    /// Advance one fixed simulation tick.
    pub fn tick(
        &mut self,
        input: &InputSnapshot,
        platforms: &[Rect],
        external_force: Vec2,
        config: &MovementConfig,
    ) -> TickOutcome {
        let previous = self.state;
        let assumed = previous.assumptions();
        self.grounded = assumed.grounded;
        self.flags = assumed.flags;

        let (checks, mut movement) = script(previous);
        for &check in checks {
            self.run_check(check, input, config);
        }

        let force = external_force.finite_or_zero();
        if movement == Motion::Hold && force != Vec2::ZERO {
            movement = Motion::Grounded;
        }

        let mut contact = Contact::Clear;
        if movement != Motion::Hold {
            let origin = self.position;
            motion::advance(self, force);
            contact = collision::resolve(self, platforms, origin);
            match movement {
                Motion::Grounded => collision::check_if_falling(self, platforms),
                Motion::GroundedAtWall => {
                    collision::check_if_falling(self, platforms);
                    collision::check_if_at_wall(self, platforms);
                },
                Motion::Airborne => collision::check_if_at_wall(self, platforms),
                Motion::Hold => {},
            }
        }

        let wall_jumped = (self.flags.wall_jumping && !assumed.flags.wall_jumping)
            .then_some(self.last_wall_jump_side);

        self.state = self.next_state(input, config);

        TickOutcome {
            previous,
            contact,
            wall_jumped,
        }
    }

    fn run_check(&mut self, check: Check, input: &InputSnapshot, config: &MovementConfig) {
        match check {
            Accelerate(regime) => motion::accelerate(self, input, regime, config),
            RunAbility => self.can_run = input.run,
            Jump => self.check_jump(input, config),
            DoubleJump => self.check_double_jump(input, config),
            WallJump => self.check_wall_jump(input, config),
            Crouch => self.flags.crouching = input.crouch && self.grounded,
            Friction => motion::apply_friction(self, input, config),
            Gravity => motion::apply_gravity(self, config),
        }
    }

    /// Full jump off the ground. Also re-arms wall jumping off either side.
    fn check_jump(&mut self, input: &InputSnapshot, config: &MovementConfig) {
        if !(input.jump && self.can_jump) {
            return;
        }
        self.velocity.y = config.full_jump_speed;
        self.jump_released = false;
        self.can_jump = false;
        self.grounded = false;
        self.flags.falling = true;
        self.flags.jumping = true;
        self.last_wall_jump_side = Side::None;
    }

    /// One mid-air jump per excursion, only on a fresh press.
    fn check_double_jump(&mut self, input: &InputSnapshot, config: &MovementConfig) {
        if !input.jump {
            self.jump_released = true;
        }
        if self.jump_released && input.jump && self.can_double_jump && !self.flags.wall_jumping {
            self.velocity.y = config.double_jump_speed;
            self.can_double_jump = false;
            self.flags.double_jumping = true;
        }
    }

    /// Launch up and away from the wall being pushed, unless it is the wall
    /// last launched from.
    fn check_wall_jump(&mut self, input: &InputSnapshot, config: &MovementConfig) {
        if !(input.jump && self.flags.wall_pushing && self.wall_side != self.last_wall_jump_side) {
            return;
        }
        self.velocity.y = config.wall_jump_y_speed;
        self.jump_released = false;
        match self.wall_side {
            Side::Right => self.velocity.x = -config.wall_jump_x_speed,
            Side::Left => self.velocity.x = config.wall_jump_x_speed,
            Side::None => {},
        }
        self.last_wall_jump_side = self.wall_side;
        self.flags.wall_jumping = true;
    }

    /// First matching branch wins; flags are not mutually exclusive.
    fn next_state(&mut self, input: &InputSnapshot, config: &MovementConfig) -> PlayerState {
        let f = self.flags;
        let vx = self.velocity.x;
        let fast = vx.abs() >= config.max_walk_speed && self.can_run;

        match self.state {
            PlayerState::Idle => {
                if !self.grounded {
                    leave_ground(f)
                } else if f.crouching {
                    PlayerState::Crouching
                } else if f.wall_pushing {
                    PlayerState::AtWall
                } else if f.accelerating {
                    PlayerState::Walking
                } else {
                    PlayerState::Idle
                }
            },
            PlayerState::Walking => {
                if !self.grounded {
                    leave_ground(f)
                } else if f.crouching {
                    PlayerState::Crouching
                } else if f.wall_pushing {
                    PlayerState::AtWall
                } else if f.sliding {
                    PlayerState::Sliding
                } else if fast {
                    PlayerState::Running
                } else {
                    PlayerState::Walking
                }
            },
            PlayerState::Running => {
                if !self.grounded {
                    leave_ground(f)
                } else if f.crouching {
                    PlayerState::Crouching
                } else if f.wall_pushing {
                    PlayerState::AtWall
                } else if f.sliding {
                    PlayerState::Sliding
                } else if !self.can_run {
                    PlayerState::Walking
                } else {
                    PlayerState::Running
                }
            },
            PlayerState::Sliding => {
                if !self.grounded {
                    leave_ground(f)
                } else if f.crouching {
                    PlayerState::Crouching
                } else if f.wall_pushing {
                    PlayerState::AtWall
                } else if f.accelerating {
                    if fast {
                        PlayerState::Running
                    } else if vx.abs() > 0.0 {
                        PlayerState::Walking
                    } else {
                        PlayerState::Sliding
                    }
                } else if vx == 0.0 {
                    PlayerState::Idle
                } else {
                    PlayerState::Sliding
                }
            },
            PlayerState::Jumping => {
                // jump cut: letting go early, or slowing past the short-jump
                // speed, pins y speed to the short-jump speed
                let cut = !input.jump || self.velocity.y.abs() <= config.short_jump_speed.abs();
                if !cut {
                    PlayerState::Jumping
                } else {
                    self.velocity.y = config.short_jump_speed;
                    if f.wall_pushing {
                        PlayerState::WallFalling
                    } else {
                        PlayerState::Falling
                    }
                }
            },
            PlayerState::DoubleJumping | PlayerState::WallJumping { .. } => {
                if self.grounded {
                    PlayerState::Landing
                } else if f.wall_pushing {
                    PlayerState::WallFalling
                } else {
                    PlayerState::Falling
                }
            },
            PlayerState::Falling => {
                if self.grounded {
                    PlayerState::Landing
                } else if f.double_jumping {
                    PlayerState::DoubleJumping
                } else if f.wall_pushing {
                    PlayerState::WallFalling
                } else {
                    PlayerState::Falling
                }
            },
            PlayerState::WallFalling => {
                if self.grounded {
                    PlayerState::Landing
                } else if f.wall_jumping {
                    PlayerState::WallJumping {
                        from: self.last_wall_jump_side,
                    }
                } else if f.double_jumping {
                    PlayerState::DoubleJumping
                } else if !f.wall_pushing {
                    PlayerState::Falling
                } else {
                    PlayerState::WallFalling
                }
            },
            PlayerState::Landing => {
                if f.sliding {
                    PlayerState::Sliding
                } else if vx >= config.max_walk_speed && self.can_run {
                    // signed: a fast leftward landing settles into Walking first
                    PlayerState::Running
                } else if vx.abs() > 0.0 {
                    PlayerState::Walking
                } else {
                    PlayerState::Idle
                }
            },
            PlayerState::Crouching => {
                if !self.grounded {
                    PlayerState::Falling
                } else if f.crouching {
                    PlayerState::Crouching
                } else if self.at_wall {
                    PlayerState::AtWall
                } else if f.accelerating {
                    if fast {
                        PlayerState::Running
                    } else if vx.abs() > 0.0 {
                        PlayerState::Walking
                    } else {
                        PlayerState::Crouching
                    }
                } else if vx == 0.0 {
                    PlayerState::Idle
                } else {
                    PlayerState::Sliding
                }
            },
            PlayerState::AtWall => {
                if !self.grounded {
                    PlayerState::Jumping
                } else if f.crouching {
                    PlayerState::Crouching
                } else if f.accelerating {
                    PlayerState::Walking
                } else if !f.wall_pushing {
                    PlayerState::Idle
                } else {
                    PlayerState::AtWall
                }
            },
        }
    }
}

fn leave_ground(f: BehaviorFlags) -> PlayerState {
    if f.jumping {
        PlayerState::Jumping
    } else {
        PlayerState::Falling
    }
}

#[cfg(test)]
mod tests {
    use mistwalk_core::input::Control;
    use mistwalk_core::test_helpers::floor_at;

    use super::*;

    const FLOOR_TOP: f32 = 200.0;
    const REST_Y: f32 = 98.0;

    fn cfg() -> MovementConfig {
        MovementConfig::default()
    }

    fn resting() -> (PlayerBody, Vec<Rect>) {
        (
            PlayerBody::spawn(Vec2::new(0.0, REST_Y), 50.0, 100.0),
            vec![floor_at(FLOOR_TOP)],
        )
    }

    fn airborne(state: PlayerState) -> PlayerBody {
        let mut body = PlayerBody::spawn(Vec2::new(0.0, 0.0), 50.0, 100.0);
        body.state = state;
        body.grounded = false;
        body.can_jump = false;
        body
    }

    fn held(controls: &[Control]) -> InputSnapshot {
        InputSnapshot::from_controls(controls)
    }

    fn tick(body: &mut PlayerBody, input: InputSnapshot, platforms: &[Rect]) -> TickOutcome {
        body.tick(&input, platforms, Vec2::ZERO, &cfg())
    }

    #[test]
    fn idle_without_input_stays_idle() {
        let (mut body, platforms) = resting();
        for _ in 0..5 {
            tick(&mut body, InputSnapshot::default(), &platforms);
            assert_eq!(body.state, PlayerState::Idle);
            assert_eq!(body.velocity, Vec2::ZERO);
        }
        assert_eq!(body.position, Vec2::new(0.0, REST_Y));
    }

    #[test]
    fn walking_turns_into_running_at_walk_cap() {
        let (mut body, platforms) = resting();
        let input = held(&[Control::MoveRight, Control::Run]);

        tick(&mut body, input, &platforms);
        assert_eq!(body.state, PlayerState::Walking);

        let mut ticks = 0;
        while body.state == PlayerState::Walking {
            tick(&mut body, input, &platforms);
            ticks += 1;
            assert!(ticks < 30, "never started running");
        }
        assert_eq!(body.state, PlayerState::Running);
        assert!(body.velocity.x >= cfg().max_walk_speed);
        assert!(body.grounded);
    }

    #[test]
    fn running_keeps_accelerating_to_run_cap() {
        let (mut body, platforms) = resting();
        let input = held(&[Control::MoveRight, Control::Run]);
        for _ in 0..40 {
            tick(&mut body, input, &platforms);
        }
        assert_eq!(body.state, PlayerState::Running);
        assert_eq!(body.velocity.x, cfg().max_run_speed);
    }

    #[test]
    fn walking_without_run_caps_at_walk_speed() {
        let (mut body, platforms) = resting();
        let input = held(&[Control::MoveRight]);
        for _ in 0..30 {
            tick(&mut body, input, &platforms);
        }
        assert_eq!(body.state, PlayerState::Walking);
        assert_eq!(body.velocity.x, cfg().max_walk_speed);
    }

    #[test]
    fn releasing_run_drops_back_to_walking_and_sheds_speed() {
        let (mut body, platforms) = resting();
        let run = held(&[Control::MoveRight, Control::Run]);
        while body.state != PlayerState::Running {
            tick(&mut body, run, &platforms);
        }
        let walk = held(&[Control::MoveRight]);
        tick(&mut body, walk, &platforms);
        assert_eq!(body.state, PlayerState::Walking);
        let vx = body.velocity.x;
        assert!(vx > cfg().max_walk_speed);

        tick(&mut body, walk, &platforms);
        assert!(body.velocity.x < vx);
        assert!(body.velocity.x >= cfg().max_walk_speed);
    }

    #[test]
    fn letting_go_slides_to_idle() {
        let (mut body, platforms) = resting();
        let input = held(&[Control::MoveRight]);
        for _ in 0..15 {
            tick(&mut body, input, &platforms);
        }

        tick(&mut body, InputSnapshot::default(), &platforms);
        assert_eq!(body.state, PlayerState::Sliding);

        let mut previous = body.velocity.x;
        for _ in 0..30 {
            if body.state == PlayerState::Idle {
                break;
            }
            tick(&mut body, InputSnapshot::default(), &platforms);
            assert!(body.velocity.x <= previous);
            previous = body.velocity.x;
        }
        assert_eq!(body.state, PlayerState::Idle);
        assert_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn gravity_accumulates_linearly_in_free_fall() {
        let mut body = airborne(PlayerState::Falling);
        for n in 1..=25 {
            tick(&mut body, InputSnapshot::default(), &[]);
            assert_eq!(body.velocity.y, n as f32);
            assert_eq!(body.state, PlayerState::Falling);
        }
    }

    #[test]
    fn falling_onto_floor_lands_then_idles() {
        let platforms = [floor_at(FLOOR_TOP)];
        let mut body = airborne(PlayerState::Falling);
        body.position.y = 50.0;

        let mut ticks = 0;
        while body.state == PlayerState::Falling {
            tick(&mut body, InputSnapshot::default(), &platforms);
            ticks += 1;
            assert!(ticks < 100, "never landed");
        }
        assert_eq!(body.state, PlayerState::Landing);
        assert!(body.grounded && body.can_jump && body.can_double_jump);
        assert!(body.flags.landing);
        assert_eq!(body.velocity.y, 0.0);
        assert_eq!(body.position.y, REST_Y);

        tick(&mut body, InputSnapshot::default(), &platforms);
        assert_eq!(body.state, PlayerState::Idle);
    }

    #[test]
    fn jump_from_idle_launches_next_tick() {
        let (mut body, platforms) = resting();
        tick(&mut body, held(&[Control::Jump]), &platforms);

        assert_eq!(body.state, PlayerState::Jumping);
        assert_eq!(body.velocity.y, cfg().full_jump_speed);
        assert!(!body.can_jump);
        assert!(!body.grounded);
        assert_eq!(body.position.y, REST_Y, "idle does not integrate");

        tick(&mut body, held(&[Control::Jump]), &platforms);
        assert_eq!(body.state, PlayerState::Jumping);
        assert!(body.position.y < REST_Y);
    }

    #[test]
    fn held_jump_rises_until_short_jump_speed() {
        let (mut body, platforms) = resting();
        let jump = held(&[Control::Jump]);
        tick(&mut body, jump, &platforms);
        let mut ticks = 0;
        while body.state == PlayerState::Jumping {
            tick(&mut body, jump, &platforms);
            ticks += 1;
            assert!(ticks < 30);
        }
        assert_eq!(body.state, PlayerState::Falling);
        assert_eq!(body.velocity.y, cfg().short_jump_speed);
        // -17 → -16 … -10: seven rising ticks
        assert_eq!(ticks, 7);
    }

    #[test]
    fn releasing_jump_cuts_it_short() {
        let (mut body, platforms) = resting();
        tick(&mut body, held(&[Control::Jump]), &platforms);
        tick(&mut body, InputSnapshot::default(), &platforms);
        assert_eq!(body.state, PlayerState::Falling);
        assert_eq!(body.velocity.y, cfg().short_jump_speed);
    }

    #[test]
    fn jump_without_can_jump_does_nothing() {
        let (mut body, platforms) = resting();
        body.can_jump = false;
        tick(&mut body, held(&[Control::Jump]), &platforms);
        assert_eq!(body.state, PlayerState::Idle);
        assert_eq!(body.velocity, Vec2::ZERO);
    }

    #[test]
    fn double_jump_needs_a_fresh_press() {
        let mut body = airborne(PlayerState::Falling);
        body.can_double_jump = true;
        body.jump_released = false;
        let jump = held(&[Control::Jump]);

        tick(&mut body, jump, &[]);
        assert_eq!(body.state, PlayerState::Falling, "held jump must not repeat");
        assert_eq!(body.velocity.y, 1.0);

        tick(&mut body, InputSnapshot::default(), &[]);
        assert!(body.jump_released);

        tick(&mut body, jump, &[]);
        assert_eq!(body.state, PlayerState::DoubleJumping);
        assert_eq!(body.velocity.y, cfg().double_jump_speed + cfg().gravity);
        assert!(!body.can_double_jump);

        tick(&mut body, jump, &[]);
        assert_eq!(body.state, PlayerState::Falling, "double jump lasts one tick");

        tick(&mut body, InputSnapshot::default(), &[]);
        let vy = body.velocity.y;
        tick(&mut body, jump, &[]);
        assert_eq!(body.state, PlayerState::Falling, "only one double jump");
        assert_eq!(body.velocity.y, vy + cfg().gravity);
    }

    fn at_right_wall(last: Side) -> (PlayerBody, Vec<Rect>) {
        let wall = Rect::new(52.0, -1000.0, 40.0, 2000.0);
        let mut body = airborne(PlayerState::WallFalling);
        body.at_wall = true;
        body.wall_side = Side::Right;
        body.last_wall_jump_side = last;
        (body, vec![wall])
    }

    #[test]
    fn wall_jump_check_sets_launch_velocity() {
        let (mut body, _) = at_right_wall(Side::None);
        body.flags.wall_pushing = true;
        body.run_check(Check::WallJump, &held(&[Control::Jump]), &cfg());
        assert_eq!(body.velocity.y, cfg().wall_jump_y_speed);
        assert_eq!(body.velocity.x, -cfg().wall_jump_x_speed);
        assert_eq!(body.last_wall_jump_side, Side::Right);
        assert!(body.flags.wall_jumping);
    }

    #[test]
    fn wall_jump_off_right_wall() {
        let (mut body, platforms) = at_right_wall(Side::None);
        let outcome = tick(&mut body, held(&[Control::Jump, Control::MoveRight]), &platforms);

        assert_eq!(outcome.wall_jumped, Some(Side::Right));
        assert_eq!(body.state, PlayerState::WallJumping { from: Side::Right });
        assert_eq!(body.velocity.x, -cfg().wall_jump_x_speed);
        assert_eq!(body.velocity.y, cfg().wall_jump_y_speed + cfg().gravity);
        assert_eq!(body.last_wall_jump_side, Side::Right);
        assert_eq!(body.wall_side, Side::None, "left the wall");

        tick(&mut body, InputSnapshot::default(), &platforms);
        assert_eq!(body.state, PlayerState::Falling, "wall jump lasts one tick");
    }

    #[test]
    fn same_wall_cannot_be_jumped_twice() {
        let (mut body, platforms) = at_right_wall(Side::Right);
        body.can_double_jump = false;
        let outcome = tick(&mut body, held(&[Control::Jump, Control::MoveRight]), &platforms);

        assert_eq!(outcome.wall_jumped, None);
        assert_eq!(body.state, PlayerState::WallFalling);
        assert_eq!(body.velocity.x, 0.0);
        assert_eq!(body.velocity.y, cfg().gravity);
        assert_eq!(body.wall_side, Side::Right);
    }

    #[test]
    fn opposite_wall_can_be_jumped_after_right_wall() {
        let (mut body, platforms) = at_right_wall(Side::Left);
        let outcome = tick(&mut body, held(&[Control::Jump, Control::MoveRight]), &platforms);
        assert_eq!(outcome.wall_jumped, Some(Side::Right));
    }

    #[test]
    fn releasing_toward_wall_falls_away() {
        let (mut body, platforms) = at_right_wall(Side::None);
        tick(&mut body, InputSnapshot::default(), &platforms);
        assert_eq!(body.state, PlayerState::Falling);
    }

    #[test]
    fn crouch_and_stand_up() {
        let (mut body, platforms) = resting();
        let crouch = held(&[Control::Crouch]);

        tick(&mut body, crouch, &platforms);
        assert_eq!(body.state, PlayerState::Crouching);
        assert_eq!(body.render_bounds().height, 50.0);

        tick(&mut body, crouch, &platforms);
        assert_eq!(body.state, PlayerState::Crouching);
        assert!(body.flags.crouching);

        tick(&mut body, InputSnapshot::default(), &platforms);
        assert_eq!(body.state, PlayerState::Idle);
        assert_eq!(body.render_bounds().height, 100.0);
    }

    #[test]
    fn crouching_ignores_horizontal_input() {
        let (mut body, platforms) = resting();
        let input = held(&[Control::Crouch, Control::MoveRight]);
        for _ in 0..5 {
            tick(&mut body, input, &platforms);
        }
        assert_eq!(body.state, PlayerState::Crouching);
        assert_eq!(body.velocity.x, 0.0);
        assert_eq!(body.position.x, 0.0);
    }

    #[test]
    fn walking_into_wall_then_pushing_is_at_wall() {
        let wall = Rect::new(100.0, -500.0, 40.0, 700.0);
        let platforms = [floor_at(FLOOR_TOP), wall];
        let (mut body, _) = resting();
        let right = held(&[Control::MoveRight]);

        let mut ticks = 0;
        while body.state != PlayerState::AtWall {
            tick(&mut body, right, &platforms);
            ticks += 1;
            assert!(ticks < 40, "never reached the wall");
        }
        assert_eq!(body.wall_side, Side::Right);
        assert_eq!(body.position.x, 48.0);
        assert_eq!(body.velocity.x, 0.0);

        tick(&mut body, right, &platforms);
        assert_eq!(body.state, PlayerState::AtWall);

        tick(&mut body, InputSnapshot::default(), &platforms);
        assert_eq!(body.state, PlayerState::Idle);
    }

    #[test]
    fn walking_off_a_ledge_falls() {
        let ledge = Rect::new(-500.0, FLOOR_TOP, 600.0, 100.0);
        let (mut body, _) = resting();
        let right = held(&[Control::MoveRight]);

        let mut ticks = 0;
        while body.state != PlayerState::Falling {
            tick(&mut body, right, &[ledge]);
            ticks += 1;
            assert!(ticks < 60, "never left the ledge");
        }
        assert!(!body.grounded);
        assert!(!body.can_jump);
        assert!(body.position.x > ledge.right());
    }

    #[test]
    fn ledge_fall_keeps_double_jump() {
        let ledge = Rect::new(-500.0, FLOOR_TOP, 600.0, 100.0);
        let (mut body, _) = resting();
        let right = held(&[Control::MoveRight]);
        while body.state != PlayerState::Falling {
            tick(&mut body, right, &[ledge]);
        }
        tick(&mut body, held(&[Control::Jump]), &[ledge]);
        assert_eq!(body.state, PlayerState::DoubleJumping);
    }

    #[test]
    fn external_force_pushes_idle_body() {
        let (mut body, platforms) = resting();
        body.tick(
            &InputSnapshot::default(),
            &platforms,
            Vec2::new(5.0, 0.0),
            &cfg(),
        );
        assert_eq!(body.position, Vec2::new(5.0, REST_Y));
        assert_eq!(body.velocity, Vec2::ZERO);
        assert_eq!(body.state, PlayerState::Idle);
    }

    #[test]
    fn force_lifting_idle_body_falls_without_a_launch() {
        let (mut body, platforms) = resting();
        body.tick(
            &InputSnapshot::default(),
            &platforms,
            Vec2::new(0.0, -1.0),
            &cfg(),
        );
        assert_eq!(body.state, PlayerState::Falling);
        assert!(!body.flags.jumping);
        assert_eq!(body.velocity.y, 0.0);
        assert_eq!(body.position.y, REST_Y - 1.0);

        let mut ticks = 0;
        while body.state != PlayerState::Landing {
            tick(&mut body, InputSnapshot::default(), &platforms);
            assert!(body.velocity.y >= 0.0, "launched upward");
            assert!(body.position.y >= REST_Y - 1.0);
            ticks += 1;
            assert!(ticks < 5, "never settled back down");
        }
        assert_eq!(body.position.y, REST_Y);
    }

    #[test]
    fn non_finite_force_is_ignored() {
        let (mut body, platforms) = resting();
        body.tick(
            &InputSnapshot::default(),
            &platforms,
            Vec2::new(f32::NAN, 1.0),
            &cfg(),
        );
        assert_eq!(body.position, Vec2::new(0.0, REST_Y));
    }

    #[test]
    fn flags_are_rebuilt_every_tick() {
        let (mut body, platforms) = resting();
        body.flags.double_jumping = true;
        body.flags.wall_jumping = true;
        tick(&mut body, InputSnapshot::default(), &platforms);
        assert!(!body.flags.double_jumping);
        assert!(!body.flags.wall_jumping);
    }

    fn against_right_wall(state: PlayerState) -> (PlayerBody, Vec<Rect>) {
        let (mut body, mut platforms) = resting();
        platforms.push(Rect::new(52.0, -500.0, 40.0, 700.0));
        body.state = state;
        body.at_wall = true;
        body.wall_side = Side::Right;
        (body, platforms)
    }

    #[test]
    fn jump_cut_while_pushing_a_wall_wall_falls() {
        let (mut body, platforms) = at_right_wall(Side::None);
        body.state = PlayerState::Jumping;
        body.velocity.y = -12.0;
        tick(&mut body, held(&[Control::MoveRight]), &platforms);

        assert_eq!(body.state, PlayerState::WallFalling);
        assert_eq!(body.velocity.y, cfg().short_jump_speed);
        assert_eq!(body.wall_side, Side::Right);
    }

    #[test]
    fn spent_wall_falls_back_on_double_jump() {
        let (mut body, platforms) = at_right_wall(Side::Right);
        tick(&mut body, held(&[Control::Jump, Control::MoveRight]), &platforms);

        assert_eq!(body.state, PlayerState::DoubleJumping);
        assert_eq!(body.velocity.y, cfg().double_jump_speed + cfg().gravity);
        assert!(!body.can_double_jump);
    }

    #[test]
    fn sliding_down_a_wall_onto_the_floor_lands() {
        let platforms = [floor_at(FLOOR_TOP), Rect::new(52.0, -1000.0, 40.0, 1200.0)];
        let mut body = airborne(PlayerState::WallFalling);
        body.position = Vec2::new(0.0, 95.0);
        body.velocity.y = 9.0;
        body.at_wall = true;
        body.wall_side = Side::Right;
        let outcome = tick(&mut body, held(&[Control::MoveRight]), &platforms);

        assert!(outcome.landed());
        assert_eq!(body.state, PlayerState::Landing);
        assert_eq!(body.position.y, REST_Y);
        assert_eq!(body.wall_side, Side::Right);
    }

    #[test]
    fn pressing_a_direction_mid_slide_walks() {
        let (mut body, platforms) = resting();
        body.state = PlayerState::Sliding;
        body.velocity.x = 5.0;
        tick(&mut body, held(&[Control::MoveRight]), &platforms);

        assert_eq!(body.state, PlayerState::Walking);
        assert_eq!(body.velocity.x, 6.0);
    }

    #[test]
    fn running_out_of_a_slide_at_walk_cap() {
        let (mut body, platforms) = resting();
        body.state = PlayerState::Sliding;
        body.velocity.x = 7.0;
        tick(&mut body, held(&[Control::MoveRight, Control::Run]), &platforms);

        assert_eq!(body.state, PlayerState::Running);
        assert_eq!(body.velocity.x, cfg().max_walk_speed);
        assert!(body.can_run);
    }

    #[test]
    fn fast_landing_with_run_held_keeps_running() {
        let (mut body, platforms) = resting();
        body.state = PlayerState::Landing;
        body.can_run = true;
        body.velocity.x = 10.0;
        tick(&mut body, held(&[Control::MoveRight, Control::Run]), &platforms);

        assert_eq!(body.velocity.x, 9.0);
        assert_eq!(body.state, PlayerState::Running);
    }

    #[test]
    fn fast_leftward_landing_settles_into_walking() {
        let (mut body, platforms) = resting();
        body.state = PlayerState::Landing;
        body.can_run = true;
        body.velocity.x = -10.0;
        tick(&mut body, held(&[Control::MoveLeft, Control::Run]), &platforms);

        assert_eq!(body.velocity.x, -9.0);
        assert_eq!(body.state, PlayerState::Walking);
    }

    #[test]
    fn landing_without_input_slides() {
        let (mut body, platforms) = resting();
        body.state = PlayerState::Landing;
        body.velocity.x = 5.0;
        tick(&mut body, InputSnapshot::default(), &platforms);

        assert_eq!(body.velocity.x, 5.0 * cfg().friction);
        assert_eq!(body.state, PlayerState::Sliding);
    }

    #[test]
    fn standing_up_with_momentum_slides() {
        let (mut body, platforms) = resting();
        body.state = PlayerState::Crouching;
        body.velocity.x = 5.0;
        tick(&mut body, InputSnapshot::default(), &platforms);

        assert_eq!(body.velocity.x, 5.0 * cfg().friction);
        assert_eq!(body.state, PlayerState::Sliding);
    }

    #[test]
    fn standing_up_beside_a_wall_is_at_wall() {
        let (mut body, platforms) = against_right_wall(PlayerState::Crouching);
        tick(&mut body, InputSnapshot::default(), &platforms);
        assert_eq!(body.state, PlayerState::AtWall);
    }

    #[test]
    fn crouch_sliding_off_a_ledge_falls() {
        let ledge = Rect::new(-500.0, FLOOR_TOP, 500.0, 100.0);
        let (mut body, _) = resting();
        body.state = PlayerState::Crouching;
        body.velocity.x = 4.0;
        tick(&mut body, held(&[Control::Crouch]), &[ledge]);

        assert_eq!(body.state, PlayerState::Falling);
        assert!(!body.grounded);
        assert!(!body.can_jump);
    }

    #[test]
    fn jumping_from_the_wall_state() {
        let (mut body, platforms) = against_right_wall(PlayerState::AtWall);
        tick(&mut body, held(&[Control::Jump, Control::MoveRight]), &platforms);

        assert_eq!(body.state, PlayerState::Jumping);
        assert_eq!(body.velocity.y, cfg().full_jump_speed);
        assert_eq!(body.position.y, REST_Y + cfg().full_jump_speed);
        assert_eq!(body.wall_side, Side::Right);
    }

    #[test]
    fn crouching_from_the_wall_state() {
        let (mut body, platforms) = against_right_wall(PlayerState::AtWall);
        tick(&mut body, held(&[Control::Crouch]), &platforms);
        assert_eq!(body.state, PlayerState::Crouching);
    }

    #[test]
    fn idle_beside_a_wall_pushes_into_it() {
        let wall = Rect::new(100.0, -500.0, 40.0, 700.0);
        let platforms = [floor_at(FLOOR_TOP), wall];
        let (mut body, _) = resting();
        let right = held(&[Control::MoveRight]);

        let mut ticks = 0;
        while body.state != PlayerState::AtWall {
            tick(&mut body, right, &platforms);
            ticks += 1;
            assert!(ticks < 40, "never reached the wall");
        }
        tick(&mut body, InputSnapshot::default(), &platforms);
        assert_eq!(body.state, PlayerState::Idle);
        assert_eq!(body.wall_side, Side::Right);

        tick(&mut body, right, &platforms);
        assert_eq!(body.state, PlayerState::AtWall);
        assert_eq!(body.velocity.x, 0.0);
        assert_eq!(body.position.x, 48.0);
    }
}
