use crate::domain::state::Player;
use crate::domain::tuning::PlayerTuning;
use crate::domain::world::World;
use glam::Vec2;
use std::f32::consts::TAU;

pub fn tick_players(world: &mut World, dt: f32) {
    let tuning = world.tuning.player;
    let bounds = Vec2::new(world.tuning.arena.width, world.tuning.arena.height);

    for player in world.players.values_mut().filter(|p| !p.dead) {
        tick_ship(player, dt, &tuning, bounds);
    }
}

pub fn tick_ship(p: &mut Player, dt: f32, tuning: &PlayerTuning, bounds: Vec2) {
    // rotation (left is counter-clockwise, both flags cancel)
    let turn = match (p.input.turn_left, p.input.turn_right) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    };
    p.heading = (p.heading + turn * tuning.turn_rate * dt).rem_euclid(TAU);

    // position integrate
    if p.input.move_forward {
        p.pos += Vec2::from_angle(p.heading) * tuning.speed * dt;
    }

    // ships cannot leave the map
    p.pos = p.pos.clamp(Vec2::ZERO, bounds);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::state::ShipInput;
    use std::f32::consts::FRAC_PI_2;

    fn ship(heading: f32, input: ShipInput) -> Player {
        let mut p = Player::new(
            1,
            "mover".into(),
            Vec2::new(100.0, 100.0),
            heading,
            &PlayerTuning::default(),
        );
        p.input = input;
        p
    }

    #[test]
    fn when_idle_then_ship_stays_put() {
        let mut p = ship(0.0, ShipInput::default());
        tick_ship(&mut p, 0.06, &PlayerTuning::default(), Vec2::splat(2000.0));
        assert_eq!(p.pos, Vec2::new(100.0, 100.0));
        assert_eq!(p.heading, 0.0);
    }

    #[test]
    fn when_moving_forward_then_ship_advances_along_heading() {
        let tuning = PlayerTuning::default();
        let mut p = ship(
            FRAC_PI_2,
            ShipInput {
                move_forward: true,
                ..ShipInput::default()
            },
        );
        tick_ship(&mut p, 1.0, &tuning, Vec2::splat(2000.0));
        assert!((p.pos.x - 100.0).abs() < 1e-3);
        assert!((p.pos.y - (100.0 + tuning.speed)).abs() < 1e-3);
    }

    #[test]
    fn when_turning_left_then_heading_increases() {
        let tuning = PlayerTuning::default();
        let mut p = ship(
            1.0,
            ShipInput {
                turn_left: true,
                ..ShipInput::default()
            },
        );
        tick_ship(&mut p, 0.5, &tuning, Vec2::splat(2000.0));
        assert!((p.heading - (1.0 + tuning.turn_rate * 0.5)).abs() < 1e-5);
    }

    #[test]
    fn when_both_turn_flags_are_set_then_they_cancel() {
        let mut p = ship(
            1.0,
            ShipInput {
                turn_left: true,
                turn_right: true,
                ..ShipInput::default()
            },
        );
        tick_ship(&mut p, 0.5, &PlayerTuning::default(), Vec2::splat(2000.0));
        assert_eq!(p.heading, 1.0);
    }

    #[test]
    fn when_moving_past_the_edge_then_position_is_clamped() {
        let mut p = ship(
            std::f32::consts::PI,
            ShipInput {
                move_forward: true,
                ..ShipInput::default()
            },
        );
        tick_ship(&mut p, 5.0, &PlayerTuning::default(), Vec2::splat(2000.0));
        assert_eq!(p.pos.x, 0.0);
    }
}
