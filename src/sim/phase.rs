//! Run phase transitions
//!
//! Menu -> Playing -> (Paused | Shop) -> Playing ... -> GameOver -> Playing | Menu.
//! Every transition is a method on `GameState`; an action that is not valid
//! in the current phase returns `PhaseError` and leaves the state untouched.

use rand::RngCore;
use thiserror::Error;

use super::shop::{PurchaseError, ShopOffer, UpgradeId};
use super::state::{GameEvent, GamePhase, GameState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {action} while {from}")]
pub struct PhaseError {
    pub from: GamePhase,
    pub action: &'static str,
}

impl GameState {
    fn require(&self, allowed: &[GamePhase], action: &'static str) -> Result<(), PhaseError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(PhaseError {
                from: self.phase,
                action,
            })
        }
    }

    /// Begin a run from the title screen
    pub fn start(&mut self) -> Result<(), PhaseError> {
        self.require(&[GamePhase::Menu], "start")?;
        let seed = self.seed;
        self.reset_run(seed);
        self.phase = GamePhase::Playing;
        self.push_event(GameEvent::RunStarted { seed });
        log::info!("Run started (seed {})", seed);
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), PhaseError> {
        self.require(&[GamePhase::Playing], "pause")?;
        self.phase = GamePhase::Paused;
        self.push_event(GameEvent::Paused);
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), PhaseError> {
        self.require(&[GamePhase::Paused], "resume")?;
        self.phase = GamePhase::Playing;
        self.push_event(GameEvent::Resumed);
        Ok(())
    }

    /// Enter the shop after a level-up with a fresh shop session
    pub(crate) fn open_shop(&mut self) -> Result<(), PhaseError> {
        self.require(&[GamePhase::Playing], "open the shop")?;
        self.shop.open();
        self.phase = GamePhase::Shop;
        let level = self.level();
        self.push_event(GameEvent::ShopOpened { level });
        log::info!("Shop opened at level {} with {} dust", level, self.dust);
        Ok(())
    }

    /// Current shop listing. Re-reading after a purchase refreshes
    /// affordability without starting a new session.
    pub fn shop_offers(&self) -> Vec<ShopOffer> {
        self.shop.offers(self.dust)
    }

    /// Redisplay the open shop after a purchase. The session carries over,
    /// so one-time items stay bought.
    pub fn refresh_shop(&self) -> Result<Vec<ShopOffer>, PhaseError> {
        self.require(&[GamePhase::Shop], "refresh the shop")?;
        Ok(self.shop_offers())
    }

    /// Buy an upgrade; returns the remaining dust
    pub fn purchase(&mut self, id: UpgradeId) -> Result<u64, PurchaseError> {
        if self.phase != GamePhase::Shop {
            return Err(PurchaseError::ShopClosed);
        }
        let cost = self.shop.purchase(id, &mut self.player, &mut self.dust)?;
        self.push_event(GameEvent::UpgradePurchased { id, cost });
        Ok(self.dust)
    }

    /// Leave the shop and continue the run
    pub fn close_shop(&mut self) -> Result<(), PhaseError> {
        self.require(&[GamePhase::Shop], "close the shop")?;
        self.phase = GamePhase::Playing;
        self.push_event(GameEvent::ShopClosed);
        Ok(())
    }

    /// Finish the run and record the result tuple
    pub(crate) fn end_run(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        let summary = self.run_summary();
        self.phase = GamePhase::GameOver;
        self.summary = Some(summary);
        self.push_event(GameEvent::GameOver(summary));
        log::info!(
            "Game over: score {} level {} dust {}",
            summary.score,
            summary.level,
            summary.dust
        );
    }

    /// Start a fresh run straight from the game over screen.
    /// The new seed is drawn from the finished run's RNG.
    pub fn restart(&mut self) -> Result<u64, PhaseError> {
        self.require(&[GamePhase::GameOver], "restart")?;
        let seed = self.rng.next_u64();
        self.reset_run(seed);
        self.phase = GamePhase::Playing;
        self.push_event(GameEvent::RunStarted { seed });
        log::info!("Run restarted (seed {})", seed);
        Ok(seed)
    }

    pub fn return_to_menu(&mut self) -> Result<(), PhaseError> {
        self.require(&[GamePhase::GameOver], "return to menu")?;
        let seed = self.seed;
        self.reset_run(seed);
        self.phase = GamePhase::Menu;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing() -> GameState {
        let mut state = GameState::new(11);
        state.start().unwrap();
        state
    }

    #[test]
    fn test_start_only_from_menu() {
        let mut state = playing();
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.events.contains(&GameEvent::RunStarted { seed: 11 }));

        let err = state.start().unwrap_err();
        assert_eq!(err.from, GamePhase::Playing);
        assert_eq!(err.to_string(), "cannot start while playing");
    }

    #[test]
    fn test_pause_resume() {
        let mut state = playing();
        state.pause().unwrap();
        assert_eq!(state.phase, GamePhase::Paused);
        assert!(state.pause().is_err());
        state.resume().unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.resume().is_err());
    }

    #[test]
    fn test_shop_cycle() {
        let mut state = playing();
        state.progression.level_up();
        state.open_shop().unwrap();
        assert_eq!(state.phase, GamePhase::Shop);
        assert!(state.events.contains(&GameEvent::ShopOpened { level: 2 }));

        state.dust = 30;
        assert_eq!(state.purchase(UpgradeId::Shield), Ok(20));
        assert!(state.player.upgrades.shield);
        let offers = state.shop_offers();
        let shield = offers.iter().find(|o| o.item.id == UpgradeId::Shield).unwrap();
        assert!(shield.purchased);

        let refreshed = state.refresh_shop().unwrap();
        assert_eq!(refreshed, offers);
        assert_eq!(state.purchase(UpgradeId::Shield), Err(PurchaseError::AlreadyPurchased(UpgradeId::Shield)));
        assert_eq!(state.dust, 20);

        state.close_shop().unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.refresh_shop().is_err());
        assert_eq!(state.purchase(UpgradeId::Heal), Err(PurchaseError::ShopClosed));
    }

    #[test]
    fn test_purchase_outside_shop_leaves_dust() {
        let mut state = playing();
        state.dust = 100;
        assert_eq!(state.purchase(UpgradeId::Heal), Err(PurchaseError::ShopClosed));
        assert_eq!(state.dust, 100);
    }

    #[test]
    fn test_end_run_records_summary() {
        let mut state = playing();
        state.score = 420;
        state.add_dust(9);
        state.end_run();
        assert_eq!(state.phase, GamePhase::GameOver);
        let summary = state.summary.unwrap();
        assert_eq!((summary.score, summary.level, summary.dust), (420, 1, 9));
        assert!(state.events.contains(&GameEvent::GameOver(summary)));
    }

    #[test]
    fn test_restart_resets_run() {
        let mut state = playing();
        state.score = 99;
        state.end_run();
        let seed = state.restart().unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.seed, seed);
        assert_eq!(state.score, 0);
        assert!(state.summary.is_none());
        assert!(state.restart().is_err());
    }

    #[test]
    fn test_restart_keeps_undrained_game_over() {
        let mut state = playing();
        state.score = 77;
        state.drain_events();
        state.end_run();
        let seed = state.restart().unwrap();

        let events = state.drain_events();
        let summary = events.iter().find_map(|e| match e {
            GameEvent::GameOver(summary) => Some(*summary),
            _ => None,
        });
        assert_eq!(summary.map(|s| s.score), Some(77));
        assert_eq!(events.last(), Some(&GameEvent::RunStarted { seed }));
    }

    #[test]
    fn test_return_to_menu() {
        let mut state = playing();
        assert!(state.return_to_menu().is_err());
        state.end_run();
        state.return_to_menu().unwrap();
        assert_eq!(state.phase, GamePhase::Menu);
    }
}
