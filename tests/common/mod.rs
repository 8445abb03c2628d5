#![allow(dead_code)]

use std::collections::BTreeSet;

use serde_json::{Value, json};
use spellfall::snapshot::CorpusSnapshot;

// A small corpus covering each kind of phrasing the extractors care about.
pub fn corpus() -> Vec<Value> {
    vec![
        json!({
            "name": "Fireball", "level": 3, "concentration": false, "ritual": false,
            "school": { "index": "evocation", "name": "Evocation" },
            "range": "150 feet", "components": ["V", "S", "M"],
            "material": "A tiny ball of bat guano and sulfur.",
            "duration": "Instantaneous", "casting_time": "1 action",
            "classes": [{ "name": "Sorcerer" }, { "name": "Wizard" }],
            "desc": [
                "A bright streak flashes from your pointing finger to a point you choose within range and then blossoms with a low roar into an explosion of flame.",
                "Each creature in a 20-foot-radius sphere centered on that point must make a Dexterity saving throw. A target takes 8d6 fire damage on a failed save, or half as much damage on a successful one."
            ],
            "higher_level": ["When you cast this spell using a spell slot of 4th level or higher, the damage increases by 1d6 for each slot level above 3rd."],
            "url": "/api/spells/fireball"
        }),
        json!({
            "name": "Lightning Bolt", "level": 3, "concentration": false, "ritual": false,
            "school": "Evocation", "range": "Self (100-foot line)", "components": ["V", "S", "M"],
            "material": "A bit of fur and a rod of amber, crystal, or glass.",
            "duration": "Instantaneous", "casting_time": "1 action",
            "classes": ["Sorcerer", "Wizard"],
            "desc": "A stroke of lightning forming a line 100 feet long and 5 feet wide blasts out from you in a direction you choose. Each creature in the line must make a Dexterity saving throw. A creature takes 8d6 lightning damage on a failed save, or half as much damage on a successful one."
        }),
        json!({
            "name": "Cone of Cold", "level": 5, "concentration": false, "ritual": false,
            "school": "Evocation", "range": "Self (60-foot cone)", "components": ["V", "S", "M"],
            "material": "A small crystal or glass cone.",
            "duration": "Instantaneous", "casting_time": "1 action",
            "classes": ["Sorcerer", "Wizard"],
            "desc": ["A blast of cold air erupts from your hands. Each creature in a 60-foot cone must make a Constitution saving throw. A creature takes 8d8 cold damage on a failed save, or half as much damage on a successful one.",
                     "A creature killed by this spell becomes a frozen statue until it thaws."],
            "higher_level": ["When you cast this spell using a spell slot of 6th level or higher, the damage increases by 1d8 for each slot level above 5th."]
        }),
        json!({
            "name": "Cure Wounds", "level": 1, "concentration": false, "ritual": false,
            "school": "Evocation", "range": "Touch", "components": ["V", "S"],
            "duration": "Instantaneous", "casting_time": "1 action",
            "classes": ["Bard", "Cleric", "Druid", "Paladin", "Ranger"],
            "desc": ["A creature you touch regains a number of hit points equal to 1d8 + your spellcasting ability modifier. This spell has no effect on undead or constructs."],
            "higher_level": ["When you cast this spell using a spell slot of 2nd level or higher, the healing increases by 1d8 for each slot level above 1st."]
        }),
        json!({
            "name": "Hold Person", "level": 2, "concentration": true, "ritual": false,
            "school": "Enchantment", "range": "60 feet", "components": ["V", "S", "M"],
            "material": "A small, straight piece of iron.",
            "duration": "Concentration, up to 1 minute", "casting_time": "1 action",
            "classes": ["Bard", "Cleric", "Druid", "Sorcerer", "Warlock", "Wizard"],
            "desc": ["Choose a humanoid that you can see within range. The target must succeed on a Wisdom saving throw or be paralyzed for the duration. At the end of each of its turns, the target can make another Wisdom saving throw. On a success, the spell ends on the target."],
            "higher_level": ["When you cast this spell using a spell slot of 3rd level or higher, you can target one additional humanoid for each slot level above 2nd."]
        }),
        json!({
            "name": "Detect Magic", "level": 1, "concentration": true, "ritual": true,
            "school": "Divination", "range": "Self", "components": ["V", "S"],
            "duration": "Concentration, up to 10 minutes", "casting_time": "1 action",
            "classes": ["Bard", "Cleric", "Druid", "Paladin", "Ranger", "Sorcerer", "Wizard"],
            "desc": ["For the duration, you sense the presence of magic within 30 feet of you. If you sense magic in this way, you can use your action to see a faint aura around any visible creature or object in the area that bears magic, and you learn its school of magic, if any."]
        }),
        json!({
            "name": "Clairvoyance", "level": 3, "concentration": true, "ritual": false,
            "school": "Divination", "range": "1 mile", "components": ["V", "S", "M"],
            "material": "A focus worth at least 100 gp, either a jeweled horn for hearing or a glass eye for seeing.",
            "duration": "Concentration, up to 10 minutes", "casting_time": "10 minutes",
            "classes": ["Bard", "Cleric", "Sorcerer", "Wizard"],
            "desc": ["You create an invisible sensor within range in a location familiar to you. The sensor remains in place for the duration, and it can't be attacked or otherwise interacted with."]
        }),
        json!({
            "name": "Wall of Fire", "level": 4, "concentration": true, "ritual": false,
            "school": "Evocation", "range": "120 feet", "components": ["V", "S", "M"],
            "material": "A small piece of phosphorus.",
            "duration": "Concentration, up to 1 minute", "casting_time": "1 action",
            "classes": ["Druid", "Sorcerer", "Wizard"],
            "desc": ["You create a wall of fire on a solid surface within range. You can make the wall up to 60 feet long, 20 feet high, and 1 foot thick, or a ringed wall up to 20 feet in diameter, 20 feet high, and 1 foot thick. The wall is opaque and lasts for the duration.",
                     "When the wall appears, each creature within its area must make a Dexterity saving throw. On a failed save, a creature takes 5d8 fire damage, or half as much damage on a successful save."]
        }),
        json!({
            "name": "Shield", "level": 1, "concentration": false, "ritual": false,
            "school": "Abjuration", "range": "Self", "components": ["V", "S"],
            "duration": "1 round",
            "casting_time": "1 reaction, which you take when you are hit by an attack or targeted by the magic missile spell",
            "classes": ["Sorcerer", "Wizard"],
            "desc": ["A barrier of magical force appears and protects you. Until the start of your next turn, you have a +5 bonus to AC, including against the triggering attack, and you take no damage from magic missile."]
        }),
        json!({
            "name": "Misty Step", "level": 2, "concentration": false, "ritual": false,
            "school": "Conjuration", "range": "Self", "components": ["V"],
            "duration": "Instantaneous", "casting_time": "1 bonus action",
            "classes": ["Sorcerer", "Warlock", "Wizard"],
            "desc": ["Briefly surrounded by silvery mist, you teleport up to 30 feet to an unoccupied space that you can see."]
        }),
        json!({
            "name": "Flame Strike", "level": 5, "concentration": false, "ritual": false,
            "school": "Evocation", "range": "60 feet", "components": ["V", "S", "M"],
            "material": "Pinch of sulfur.",
            "duration": "Instantaneous", "casting_time": "1 action",
            "classes": ["Cleric"],
            "desc": ["A vertical column of divine fire roars down from the heavens in a location you specify. Each creature in a 10-foot-radius, 40-foot-high cylinder centered on a point within range must make a Dexterity saving throw. A creature takes 4d6 fire damage and 4d6 radiant damage on a failed save, or half as much damage on a successful one."]
        }),
        json!({
            "name": "Odd Dice", "level": 1, "concentration": false, "ritual": false,
            "school": "Evocation", "range": "30 feet", "components": ["V", "S"],
            "duration": "Instantaneous", "casting_time": "1 action",
            "classes": ["Wizard"],
            "desc": ["A spray of caustic droplets hits one creature, which takes 2d7 acid damage."]
        }),
        json!({
            "name": "Chill Needle", "level": 1, "concentration": false, "ritual": false,
            "school": "Evocation", "range": "60 feet", "components": ["V", "S"],
            "duration": "Instantaneous", "casting_time": "1 action",
            "classes": ["Sorcerer", "Wizard"],
            "desc": ["A needle of frost strikes a creature within range. The target must make a Constitution saving throw, taking 2d4+3 cold damage on a failed save."]
        }),
        json!({
            "name": "Resurrection", "level": 7, "concentration": false, "ritual": false,
            "school": "Necromancy", "range": "Touch", "components": ["V", "S", "M"],
            "material": "A diamond worth at least 1,000 gp, which the spell consumes.",
            "duration": "Instantaneous", "casting_time": "1 hour",
            "classes": ["Bard", "Cleric"],
            "desc": ["You touch a dead creature that has been dead for no more than a century, that didn't die of old age, and that isn't undead. If its soul is free and willing, the target returns to life with all its hit points."]
        }),
        json!({
            "name": "Far Beacon", "level": 2, "concentration": false, "ritual": false,
            "school": "Divination", "range": "5280 feet", "components": ["V"],
            "duration": "1 hour", "casting_time": "1 action",
            "classes": ["Ranger"],
            "desc": ["A mote of light marks a spot you can see, visible to your allies for the duration."]
        }),
        json!({
            "name": "Motes of Flame", "level": 4, "concentration": false, "ritual": false,
            "school": "Evocation", "range": "90 feet", "components": ["V", "S"],
            "duration": "Instantaneous", "casting_time": "1 action",
            "classes": ["Druid"],
            "desc": ["Motes of light fill a 5-foot-radius sphere. Then a 10-foot-radius, 40-foot-high cylinder of flame erupts."]
        }),
    ]
}

pub fn snapshot() -> CorpusSnapshot {
    CorpusSnapshot::load(&corpus()).expect("fixture corpus loads")
}

pub fn names(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}
