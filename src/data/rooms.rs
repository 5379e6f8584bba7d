use crate::simulation::dice::{pick, Dice};

/// Flavor text only. Room names and tags never influence rules; they
/// exist so every arrival message reads differently.
pub const ROOM_NAMES: &[&str] = &[
    "Dank Passage",
    "Mossy Archway",
    "Collapsed Hall",
    "Silent Crypt",
    "Crystal Cavern",
    "Forgotten Library",
    "Shimmering Tunnel",
    "Broken Bridge",
    "Abandoned Barracks",
    "Sealed Vault",
    "Forgotten Armory",
    "Dust-Choked Stacks",
    "Sarcophagus Row",
    "Ossuary Niche",
    "Ghoul Warren",
    "Spider Den",
    "Mushroom Grotto",
    "Glowworm Hollow",
    "Phosphor Cavern",
    "Bioluminescent Pool",
    "Dripping Gallery",
    "Whispering Hall",
    "Hall of Echoes",
    "Howling Vent",
    "Flooded Tunnel",
    "Sunken Archive",
    "Drowned Chapel",
    "Rotted Sluice",
    "Stagnant Cistern",
    "Collapsed Aqueduct",
    "Cracked Causeway",
    "Broken Stair",
    "Rift Walk",
    "Seismic Fissure",
    "Rubble Ramp",
    "Shattered Sanctum",
    "Desecrated Shrine",
    "Black Altar",
    "Runesmith's Forge",
    "Ashen Furnace",
    "Soot-Stained Chimney",
    "Obsidian Gallery",
    "Vein of Crystal",
    "Quarry Cut",
    "Mosaic Rotunda",
    "Timeworn Rotunda",
    "Hidden Antechamber",
    "Secret Pantry",
    "Servants' Passage",
    "Supply Cache",
    "Prospector's Camp",
    "Miner's Rest",
    "Collapsed Shaft",
    "Rust Gate",
    "Iron Portcullis",
    "Warden's Watch",
    "Jailor's Gallery",
    "Chainworks",
    "Wardstone Ring",
    "Arcane Observatory",
    "Star Chamber",
    "Chill Refectory",
    "Frostbitten Corridor",
    "Bonepile Crossing",
    "Gallows Landing",
    "Worm-Tunnel",
    "Slime Channel",
    "Chittering Nest",
    "Thorn Pit",
    "Gloomed Nave",
    "Runed Threshold",
    "Echoing Narthex",
];

pub const ROOM_TAGS: &[&str] = &[
    "Calm",
    "Damp",
    "Echoing",
    "Dank",
    "Fetid",
    "Fungal",
    "Icy",
    "Gusty",
    "Mossy",
    "Dripping",
    "Whispering",
    "Gloomy",
    "Stagnant",
    "Claustrophobic",
    "Crumbling",
    "Ruined",
    "Collapsed",
    "Flooded",
    "Silted",
    "Frostbitten",
    "Chill",
    "Webbed",
    "Infested",
    "Ossuary",
    "Bone-Littered",
    "Mildewed",
    "Moldy",
    "Rot-Stained",
    "Dust-Choked",
    "Sulfurous",
    "Miasmic",
    "Smoky",
    "Ashen",
    "Scorched",
    "Sooty",
    "Crystalline",
    "Shimmering",
    "Phosphorescent",
    "Bioluminescent",
    "Arcane",
    "Runed",
    "Hexed",
    "Cursed",
    "Haunted",
    "Spectral",
    "Unholy",
    "Sanctified",
    "Ancient",
    "Forgotten",
    "Hidden",
    "Labyrinthine",
    "Twisting",
    "Narrow",
    "Broad",
    "Eerie",
    "Gloaming",
    "Shadowed",
    "Wind-Scoured",
    "Seismic",
    "Rumbling",
    "Quaking",
    "Verminous",
    "Putrid",
    "Stench-Ridden",
    "Slick",
    "Iridescent",
    "Frozen",
    "Ember-Lit",
    "Torchlit",
    "Starved of Light",
    "Thunderous",
];

/// Randomly drawn room description, e.g. "Mossy Archway (Haunted)".
pub fn describe_room(dice: &mut dyn Dice) -> String {
    let name = pick(dice, ROOM_NAMES);
    let tag = pick(dice, ROOM_TAGS);
    format!("{} ({})", name, tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::dice::SeededDice;

    #[test]
    fn room_description_combines_name_and_tag() {
        let mut dice = SeededDice::new(7);
        let text = describe_room(&mut dice);
        assert!(text.contains('('));
        assert!(text.ends_with(')'));
    }
}
