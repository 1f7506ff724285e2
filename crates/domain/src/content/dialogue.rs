//! Narrative dialogue table
//!
//! Keyed template strings with `{field}` substitution from a context map.
//! A missing key is not an error: callers fall back to [`FALLBACK_LINE`]
//! and log the miss on their side.

use std::collections::HashMap;

/// Served when a dialogue key is absent from the table.
pub const FALLBACK_LINE: &str = "...";

#[derive(Debug)]
pub struct DialogueTable {
    entries: HashMap<&'static str, &'static str>,
}

impl DialogueTable {
    pub fn builtin() -> Self {
        let mut entries = HashMap::new();
        let mut put = |k, v| {
            entries.insert(k, v);
        };
        put("menu.welcome", "Torchlight gutters over the sign: THE LABYRINTH. Few return. Fewer return rich.");
        put("menu.farewell", "The torch burns low. Come back when your nerve does.");
        put("intro.charge", "The mayor grips your hand. 'A Dragon nests beneath the fifth vault. Kill it, {name}, and the town is saved.'");
        put("intro.warning", "'Others went down before you. The labyrinth kept them.'");
        put("create.greeting", "The recruiter looks you over. 'Name first. Then we see what you're made of.'");
        put("town.welcome", "Lanternlight and woodsmoke: the town square. Every road here ends at the labyrinth gate.");
        put("town.healer", "The healer's hands glow faintly as your wounds close.");
        put("town.trainer", "The drill-master works you until your arms shake.");
        put("shop.greeting", "'Buying or selling?' The shopkeep's scales are honest. Mostly.");
        put("smith.repair", "The smith turns the piece over once and nods. 'Thirty gold. Good as new.'");
        put("temple.cleanse", "Incense coils around the cursed thing until the malice drains out of it.");
        put("labyrinth.gate", "Cold air breathes up the stairwell. The labyrinth waits below.");
        put("labyrinth.descend", "You descend to depth {depth}. The dark presses closer here.");
        put("combat.engage", "A {monster} blocks the way!");
        put("combat.victory", "The {monster} falls. Silence rushes back in.");
        put("death.blow", "The world tilts. Stone meets your cheek, strangely warm.");
        put("revival.success", "You wake on the temple floor, lessened but alive. The priests do not meet your eyes.");
        put("revival.failure", "The darkness does not let go. Your story ends beneath the town.");
        put("victory.dragon", "The Dragon's last breath scorches the vault ceiling, and then there is only the sound of settling coins.");
        put("victory.legend", "Bards will argue the details, but every version names {name}.");
        put("review.thanks", "Your words are sealed into the town chronicle.");
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&'static str> {
        self.entries.get(key).copied()
    }

    /// Substitute `{field}` placeholders from the context map.
    pub fn render(template: &str, ctx: &[(&str, &str)]) -> String {
        let mut out = template.to_string();
        for (key, value) in ctx {
            out = out.replace(&format!("{{{}}}", key), value);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_named_fields() {
        let table = DialogueTable::builtin();
        let template = table.get("combat.engage").expect("known key");
        assert_eq!(
            DialogueTable::render(template, &[("monster", "Goblin")]),
            "A Goblin blocks the way!"
        );
    }

    #[test]
    fn test_missing_key_is_a_none_not_a_panic() {
        let table = DialogueTable::builtin();
        assert!(table.get("no.such.key").is_none());
    }
}
