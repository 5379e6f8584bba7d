pub mod pricing;
pub mod progression;

pub use pricing::{
    scaled_weapon_power, sell_price, shield_drop_price, shield_rarity, shield_shop_price,
    weapon_drop_price, weapon_rarity, weapon_shop_price, Rarity,
};
pub use progression::{gain_gold, gain_xp, player_damage_range, scaled_reward};
