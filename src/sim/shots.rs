//! Player shot and enemy return shot
//!
//! Each shot is a singleton pool slot. A new shot only spawns while its slot
//! is disabled.

use super::collision::overlaps;
use super::state::{Frame, GamePhase, GameState, SpriteId};
use super::timers::{TimerAction, TimerSlot};
use crate::audio::{SoundEffect, SoundSink};
use crate::consts::*;

/// Launch the player shot from the player's position.
/// Returns false (and changes nothing) if a shot is already in flight.
pub fn fire_player_shot<S: SoundSink + ?Sized>(state: &mut GameState, sink: &mut S) -> bool {
    if state.pool.player_shot().enabled {
        return false;
    }
    let x = state.pool.player().x;
    state
        .pool
        .spawn(SpriteId::PLAYER_SHOT, x, PLAYER_SHOT_LAUNCH_Y, Frame::PlayerShot, PLAYER_COLOR);
    state
        .timers
        .schedule(TimerSlot::ReturnShot, RETURN_SHOT_DELAY, TimerAction::ReturnShot);
    sink.play(SoundEffect::Shot);
    true
}

/// Move the player shot up and resolve hits against the formation
pub fn update_player_shot<S: SoundSink + ?Sized>(state: &mut GameState, sink: &mut S) {
    let shot = state.pool.get_mut(SpriteId::PLAYER_SHOT);
    if !shot.enabled {
        return;
    }
    if shot.y < SHOT_SPEED {
        shot.enabled = false;
        return;
    }
    shot.y -= SHOT_SPEED;

    // Exploding enemies are already counted as destroyed
    let hit = state.pool.enabled_enemies().find_map(|(id, enemy)| {
        (enemy.frame != Frame::Explosion
            && overlaps(
                &state.pool,
                SpriteId::PLAYER_SHOT,
                id,
                SHOT_RIGHT_INSET,
                SHOT_LEFT_INSET,
            ))
        .then_some(id)
    });

    if let Some(id) = hit {
        state.pool.disable(SpriteId::PLAYER_SHOT);
        state.pool.get_mut(id).frame = Frame::Explosion;
        state.formation.enemy_destroyed();
        sink.play(SoundEffect::Explosion);
        state
            .timers
            .schedule(TimerSlot::ClearExplosions, EXPLOSION_TICKS, TimerAction::ClearExplosions);
        log::debug!(
            "enemy {} destroyed, {} remaining",
            id.index(),
            state.formation.alive_count
        );

        if state.formation.is_cleared() && state.phase == GamePhase::Playing {
            state.phase = GamePhase::WaveCleared;
            log::info!("Wave cleared after {} ticks", state.time_ticks);
        }
    }
}

/// Enabled enemy closest to the player horizontally. Ties go to the enemy
/// scanned last.
pub fn nearest_enemy(state: &GameState) -> Option<SpriteId> {
    let player_x = i16::from(state.pool.player().x);
    let mut nearest = None;
    let mut nearest_dx = i16::MAX;
    for (id, enemy) in state.pool.enabled_enemies() {
        let dx = (i16::from(enemy.x) - player_x).abs();
        if dx <= nearest_dx {
            nearest_dx = dx;
            nearest = Some(id);
        }
    }
    nearest
}

/// Timer action: the enemy nearest the player fires back
pub fn return_shot(state: &mut GameState) {
    if state.pool.enemy_shot().enabled {
        return;
    }
    let Some(id) = nearest_enemy(state) else {
        return;
    };
    let shooter = *state.pool.get(id);
    state.pool.spawn(
        SpriteId::ENEMY_SHOT,
        shooter.x,
        shooter.y.saturating_add(SPRITE_DIM),
        Frame::EnemyShot,
        shooter.color,
    );
}

/// Move the enemy shot down and resolve a hit on the player
pub fn update_enemy_shot<S: SoundSink + ?Sized>(state: &mut GameState, sink: &mut S) {
    let shot = state.pool.get_mut(SpriteId::ENEMY_SHOT);
    if !shot.enabled {
        return;
    }
    if usize::from(shot.y) >= SCREEN_H - usize::from(SHOT_SPEED) {
        shot.enabled = false;
        return;
    }
    shot.y += SHOT_SPEED;

    // An exploding player has already lost this life
    if state.pool.player_exploding() {
        return;
    }
    if overlaps(
        &state.pool,
        SpriteId::ENEMY_SHOT,
        SpriteId::PLAYER,
        SHOT_RIGHT_INSET,
        SHOT_LEFT_INSET,
    ) {
        state.pool.disable(SpriteId::ENEMY_SHOT);
        state.pool.get_mut(SpriteId::PLAYER).frame = Frame::Explosion;
        state.lives = state.lives.saturating_sub(1);
        sink.play(SoundEffect::Explosion);
        state
            .timers
            .schedule(TimerSlot::RestorePlayer, RESPAWN_TICKS, TimerAction::RestorePlayer);
        log::debug!("player hit, {} lives left", state.lives);

        if state.lives == 0 {
            state.phase = GamePhase::GameOver;
            log::info!("Game over: out of lives at tick {}", state.time_ticks);
        }
    }
}

/// Timer action: drop every enemy still showing the explosion frame
pub fn clear_explosions(state: &mut GameState) {
    for enemy in state.pool.enemies_mut() {
        if enemy.frame == Frame::Explosion {
            enemy.enabled = false;
        }
    }
}
