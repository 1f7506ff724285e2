//! The town shop
//!
//! Buy pages list the full catalogue; selling haggles at half base value,
//! swayed by Charisma and a little luck, behind a confirmation step.
//! Damaged, equipped, cursed, and labyrinth-found gear never sells.

use labyrinth_domain::{Attribute, Character, DiceSource};
use labyrinth_shared::MenuOption;

use crate::game::action::{Action, ShopAction};
use crate::game::engine::{GameEngine, PendingSale, Phase, SaleKind, ShopPage};
use crate::game::events::Events;

/// Sell price: half base, Charisma tier, and a ±10% haggle swing.
pub(crate) fn haggle_price(dice: &mut dyn DiceSource, character: &Character, base: i32) -> i32 {
    let cha = character.attribute(Attribute::Charisma);
    let tier = if cha >= 15 {
        1.2
    } else if cha <= 6 {
        0.8
    } else {
        1.0
    };
    let swing = 0.9 + dice.fraction() * 0.2;
    ((base as f64 * 0.5 * tier * swing).floor() as i32).max(1)
}

impl GameEngine {
    pub(crate) fn render_shop(&mut self, ev: &mut Events) {
        match self.shop_page {
            ShopPage::Front => {
                self.say_line(ev, "shop.greeting", &[]);
                ev.menu(vec![
                    MenuOption::new("shop:weapons", "Weapons"),
                    MenuOption::new("shop:armor", "Armor"),
                    MenuOption::new("shop:potions", "Potions"),
                    MenuOption::new("shop:spells", "Spell scrolls"),
                    MenuOption::new("shop:sell", "Sell from your pack"),
                    MenuOption::new("shop:back", "Leave the shop"),
                ]);
            }
            ShopPage::Weapons => {
                let mut options: Vec<MenuOption> = self
                    .content
                    .weapons
                    .all()
                    .iter()
                    .map(|r| {
                        MenuOption::new(
                            format!("shop:buy:{}", r.name),
                            format!("{} ({}) - {} gold", r.name, r.damage_die, r.price),
                        )
                    })
                    .collect();
                options.push(MenuOption::new("shop:back", "Back"));
                ev.menu(options);
            }
            ShopPage::Armor => {
                let mut options: Vec<MenuOption> = self
                    .content
                    .armors
                    .all()
                    .iter()
                    .map(|r| {
                        MenuOption::new(
                            format!("shop:buy:{}", r.name),
                            format!("{} (AC {}) - {} gold", r.name, r.armor_class, r.price),
                        )
                    })
                    .collect();
                options.push(MenuOption::new("shop:back", "Back"));
                ev.menu(options);
            }
            ShopPage::Potions => {
                let mut options: Vec<MenuOption> = self
                    .content
                    .potions
                    .all()
                    .iter()
                    .map(|r| {
                        MenuOption::new(
                            format!("shop:buy:{}", r.name),
                            format!("{} - {} gold ({})", r.name, r.price, r.blurb),
                        )
                    })
                    .collect();
                options.push(MenuOption::new("shop:back", "Back"));
                ev.menu(options);
            }
            ShopPage::Spells => {
                let mut options: Vec<MenuOption> = self
                    .content
                    .spells
                    .all()
                    .iter()
                    .map(|r| {
                        MenuOption::new(
                            format!("shop:buy:{}", r.name),
                            format!("{} - {} gold ({})", r.name, r.price, r.blurb),
                        )
                    })
                    .collect();
                options.push(MenuOption::new("shop:back", "Back"));
                ev.menu(options);
            }
            ShopPage::Sell => self.render_sell_page(ev),
        }
    }

    fn render_sell_page(&mut self, ev: &mut Events) {
        let Some(c) = self.character.as_ref() else {
            return;
        };

        if let Some(sale) = &self.pending_sale {
            ev.say(format!("'I can give you {} gold. Deal?'", sale.offer));
            ev.menu(vec![
                MenuOption::new("shop:confirm_sale", "Shake on it"),
                MenuOption::new("shop:cancel_sale", "Keep it"),
            ]);
            return;
        }

        let mut options = Vec::new();
        for (i, w) in c.weapons.iter().enumerate() {
            if weapon_sellable(c, i) {
                options.push(MenuOption::new(
                    format!("shop:sell_weapon:{}", i),
                    format!("{} (base {} gold)", w.name, w.price),
                ));
            }
        }
        for (i, a) in c.armors.iter().enumerate() {
            if armor_sellable(c, i) {
                options.push(MenuOption::new(
                    format!("shop:sell_armor:{}", i),
                    format!("{} (base {} gold)", a.name, a.price),
                ));
            }
        }
        for (i, r) in c.rings.iter().enumerate() {
            if !r.cursed {
                options.push(MenuOption::new(
                    format!("shop:sell_ring:{}", i),
                    format!("{} (base {} gold)", r.name, r.price),
                ));
            }
        }
        if options.is_empty() {
            ev.say("'Nothing in that pack I'd put coin on.'");
        }
        options.push(MenuOption::new("shop:back", "Back"));
        ev.menu(options);
    }

    pub(crate) async fn handle_shop(&mut self, action: Action, ev: &mut Events) {
        match action {
            Action::Continue => self.advance(ev).await,
            Action::Shop(shop_action) => self.shop_action(shop_action, ev).await,
            _ => self.ignore_and_rerender(ev).await,
        }
    }

    async fn shop_action(&mut self, action: ShopAction, ev: &mut Events) {
        match action {
            ShopAction::Weapons => {
                self.shop_page = ShopPage::Weapons;
                self.render_shop(ev);
            }
            ShopAction::Armor => {
                self.shop_page = ShopPage::Armor;
                self.render_shop(ev);
            }
            ShopAction::Potions => {
                self.shop_page = ShopPage::Potions;
                self.render_shop(ev);
            }
            ShopAction::Spells => {
                self.shop_page = ShopPage::Spells;
                self.render_shop(ev);
            }
            ShopAction::Sell => {
                self.shop_page = ShopPage::Sell;
                self.pending_sale = None;
                self.render_shop(ev);
            }
            ShopAction::Back => {
                self.pending_sale = None;
                if self.shop_page == ShopPage::Front {
                    self.enter_phase(Phase::Town, ev).await;
                } else {
                    self.shop_page = ShopPage::Front;
                    self.render_shop(ev);
                }
            }
            ShopAction::Buy(name) => self.buy_item(&name, ev),
            ShopAction::SellWeapon(i) => self.offer_sale(SaleKind::Weapon, i, ev),
            ShopAction::SellArmor(i) => self.offer_sale(SaleKind::Armor, i, ev),
            ShopAction::SellRing(i) => self.offer_sale(SaleKind::Ring, i, ev),
            ShopAction::ConfirmSale => self.confirm_sale(ev),
            ShopAction::CancelSale => {
                self.pending_sale = None;
                ev.say("'Suit yourself.'");
                self.render_shop(ev);
            }
        }
    }

    fn buy_item(&mut self, name: &str, ev: &mut Events) {
        let GameEngine {
            character, content, ..
        } = self;
        let Some(c) = character.as_mut() else {
            return;
        };

        let purchase = match self.shop_page {
            ShopPage::Weapons => content.weapons.by_name(name).map(|r| (r.price, Stock::Weapon)),
            ShopPage::Armor => content.armors.by_name(name).map(|r| (r.price, Stock::Armor)),
            ShopPage::Potions => content.potions.by_name(name).map(|r| (r.price, Stock::Potion)),
            ShopPage::Spells => content.spells.by_name(name).map(|r| (r.price, Stock::Spell)),
            _ => None,
        };
        let Some((price, stock)) = purchase else {
            ev.say("'Never stocked that.'");
            self.render_shop(ev);
            return;
        };

        if c.spend_gold(price).is_err() {
            ev.say(format!("'That's {} gold. Count again.'", price));
            self.render_shop(ev);
            return;
        }

        match stock {
            Stock::Weapon => {
                if let Some(row) = content.weapons.by_name(name) {
                    let index = c.add_weapon(row.to_weapon(false));
                    if c.equipped_weapon.is_none() {
                        let _ = c.equip_weapon(index);
                        ev.say(format!("You buy the {} and strap it on.", name));
                    } else {
                        ev.say(format!("The {} goes into your pack.", name));
                    }
                }
            }
            Stock::Armor => {
                if let Some(row) = content.armors.by_name(name) {
                    let index = c.add_armor(row.to_armor(false));
                    if c.equipped_armor.is_none() {
                        let _ = c.equip_armor(index);
                        ev.say(format!("You buy the {} and buckle in.", name));
                    } else {
                        ev.say(format!("The {} goes into your pack.", name));
                    }
                }
            }
            Stock::Potion => {
                c.add_potion(name);
                ev.say(format!("A {} potion, stoppered and paid for.", name));
            }
            Stock::Spell => {
                c.add_spell(name);
                ev.say(format!("A scroll of {}, inked and ready.", name));
            }
        }

        tracing::debug!(item = name, price, "Purchase made");
        self.render_shop(ev);
        self.push_stats(ev);
    }

    fn offer_sale(&mut self, kind: SaleKind, index: usize, ev: &mut Events) {
        let GameEngine {
            dice, character, ..
        } = self;
        let Some(c) = character.as_ref() else {
            return;
        };

        let base = match kind {
            SaleKind::Weapon if weapon_sellable(c, index) => {
                c.weapons.get(index).map(|w| w.price)
            }
            SaleKind::Armor if armor_sellable(c, index) => c.armors.get(index).map(|a| a.price),
            SaleKind::Ring => c
                .rings
                .get(index)
                .filter(|r| !r.cursed)
                .map(|r| r.price),
            _ => None,
        };
        let Some(base) = base else {
            ev.say("'Not that one. I have standards, and it has problems.'");
            self.render_shop(ev);
            return;
        };

        let offer = haggle_price(dice.as_mut(), c, base);
        self.pending_sale = Some(PendingSale { kind, index, offer });
        self.render_shop(ev);
    }

    fn confirm_sale(&mut self, ev: &mut Events) {
        let Some(sale) = self.pending_sale.take() else {
            self.render_shop(ev);
            return;
        };
        let Some(c) = self.character.as_mut() else {
            return;
        };

        let sold = match sale.kind {
            SaleKind::Weapon => c.remove_weapon(sale.index).map(|w| w.name).ok(),
            SaleKind::Armor => c.remove_armor(sale.index).map(|a| a.name).ok(),
            SaleKind::Ring => c.unbind_ring(sale.index).map(|r| r.name).ok(),
        };

        match sold {
            Some(name) => {
                c.earn_gold(sale.offer);
                ev.say(format!("The {} changes hands for {} gold.", name, sale.offer));
            }
            None => ev.say("'Changed my mind. Something's off about it.'"),
        }
        self.render_shop(ev);
        self.push_stats(ev);
    }
}

enum Stock {
    Weapon,
    Armor,
    Potion,
    Spell,
}

fn weapon_sellable(c: &Character, index: usize) -> bool {
    c.weapons.get(index).is_some_and(|w| {
        !w.damaged && !w.labyrinth_drop && c.equipped_weapon != Some(index)
    })
}

fn armor_sellable(c: &Character, index: usize) -> bool {
    c.armors.get(index).is_some_and(|a| {
        !a.damaged && !a.labyrinth_drop && c.equipped_armor != Some(index)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedDice;
    use labyrinth_domain::{Attributes, Difficulty, Weapon};

    fn merchant_friend(cha: i32) -> Character {
        let mut attrs = Attributes::uniform(10);
        attrs.set(Attribute::Charisma, cha);
        Character::new("Vend", Difficulty::Normal, "dev", attrs, 30, 100)
    }

    #[test]
    fn test_haggle_tiers() {
        // fraction 0.5 -> swing exactly 1.0
        let mut dice = ScriptedDice::default();
        dice.queue_fractions([0.5, 0.5, 0.5]);

        let plain = haggle_price(&mut dice, &merchant_friend(10), 100);
        assert_eq!(plain, 50);
        let silver_tongue = haggle_price(&mut dice, &merchant_friend(15), 100);
        assert_eq!(silver_tongue, 60);
        let mumbler = haggle_price(&mut dice, &merchant_friend(6), 100);
        assert_eq!(mumbler, 40);
    }

    #[test]
    fn test_haggle_never_below_one() {
        let mut dice = ScriptedDice::default();
        dice.queue_fractions([0.0]);
        assert_eq!(haggle_price(&mut dice, &merchant_friend(6), 1), 1);
    }

    #[test]
    fn test_sellable_filters() {
        let mut c = merchant_friend(10);
        let clean = c.add_weapon(Weapon {
            name: "Dagger".into(),
            damage_die: "1d4".into(),
            price: 10,
            damaged: false,
            labyrinth_drop: false,
        });
        let chipped = c.add_weapon(Weapon {
            name: "Club".into(),
            damage_die: "1d6".into(),
            price: 8,
            damaged: true,
            labyrinth_drop: false,
        });
        let plunder = c.add_weapon(Weapon {
            name: "Great Sword".into(),
            damage_die: "2d8".into(),
            price: 120,
            damaged: false,
            labyrinth_drop: true,
        });

        assert!(weapon_sellable(&c, clean));
        assert!(!weapon_sellable(&c, chipped));
        assert!(!weapon_sellable(&c, plunder));

        c.equip_weapon(clean).expect("valid index");
        assert!(!weapon_sellable(&c, clean));
    }
}
