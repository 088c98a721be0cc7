//! Shared fixtures for unit tests.

use dm_core::{BaseStatBlock, Catalog, Character, HpProgression};

/// A small catalog with a fixed-skill class (warrior), a chosen-skill class
/// (bard), and an exempt class (retainer).
pub(crate) fn catalog() -> Catalog {
    Catalog::from_json(CATALOG).unwrap()
}

/// Stats in block order: STR, CON, DEX, INT, WIS, CHA.
pub(crate) fn stats(scores: [i32; 6]) -> BaseStatBlock {
    BaseStatBlock::from_scores(scores)
}

/// A stored character with no hit points or skills yet.
pub(crate) fn character(class_id: &str, level: u32, scores: [i32; 6]) -> Character {
    Character {
        id: "mouse-1".to_string(),
        name: "Pip".to_string(),
        trait_: String::new(),
        bio: String::new(),
        xp: 0,
        level,
        class_id: class_id.to_string(),
        house_id: "house-1".to_string(),
        county_id: "barley".to_string(),
        current_base_stats: stats(scores),
        original_base_stats: stats(scores),
        hp_progression: HpProgression::default(),
        skills: Vec::new(),
        chosen_class_skills: None,
    }
}

const CATALOG: &str = r#"{
  "stats": [
    {
      "id": "strength",
      "name": "Strength",
      "abbreviation": "STR",
      "order": 1
    },
    {
      "id": "constitution",
      "name": "Constitution",
      "abbreviation": "CON",
      "order": 2
    },
    {
      "id": "dexterity",
      "name": "Dexterity",
      "abbreviation": "DEX",
      "order": 3
    },
    {
      "id": "intelligence",
      "name": "Intelligence",
      "abbreviation": "INT",
      "order": 4
    },
    {
      "id": "wisdom",
      "name": "Wisdom",
      "abbreviation": "WIS",
      "order": 5
    },
    {
      "id": "charisma",
      "name": "Charisma",
      "abbreviation": "CHA",
      "order": 6
    }
  ],
  "counties": [
    {
      "id": "barley",
      "name": "Barley Downs",
      "associatedStatId": "dexterity",
      "associatedSkills": [
        "Stealth"
      ]
    },
    {
      "id": "thornwood",
      "name": "Thornwood",
      "associatedStatId": "strength",
      "associatedSkills": [
        "Athletics"
      ]
    }
  ],
  "classes": [
    {
      "id": "warrior",
      "name": "Warrior",
      "isAvailable": true,
      "abilities": [
        {
          "name": "Shield Wall",
          "level": 3,
          "description": ""
        }
      ],
      "skillIds": [
        "athletics",
        "stealth"
      ],
      "prerequisites": [
        {
          "stat": "constitution",
          "min": 9
        }
      ],
      "willpower_advancement": "none",
      "hit_die": "1d10",
      "baseValues": {
        "1": {
          "defense": 1,
          "attack": "1d6",
          "skill_ranks": 2
        },
        "2": {
          "defense": 2,
          "attack": "1d6",
          "skill_ranks": 2
        },
        "3": {
          "defense": 2,
          "attack": "1d6",
          "skill_ranks": 4
        },
        "4": {
          "defense": 3,
          "attack": "1d6",
          "skill_ranks": 4
        },
        "5": {
          "defense": 3,
          "attack": "1d6",
          "skill_ranks": 5
        },
        "6": {
          "defense": 4,
          "attack": "1d6",
          "skill_ranks": 5
        },
        "7": {
          "defense": 4,
          "attack": "1d6",
          "skill_ranks": 3
        }
      }
    },
    {
      "id": "bard",
      "name": "Bard",
      "isAvailable": true,
      "abilities": [],
      "skillIds": [],
      "prerequisites": [
        {
          "stat": "charisma",
          "min": 12
        }
      ],
      "willpower_advancement": "each_level",
      "hit_die": "1d6",
      "baseValues": {
        "1": {
          "defense": 1,
          "attack": "1d4",
          "skill_ranks": 2
        },
        "2": {
          "defense": 1,
          "attack": "1d4",
          "skill_ranks": 2
        },
        "3": {
          "defense": 1,
          "attack": "1d4",
          "skill_ranks": 2
        },
        "4": {
          "defense": 1,
          "attack": "1d4",
          "skill_ranks": 2
        },
        "5": {
          "defense": 1,
          "attack": "1d4",
          "skill_ranks": 2
        },
        "6": {
          "defense": 1,
          "attack": "1d4",
          "skill_ranks": 2
        },
        "7": {
          "defense": 1,
          "attack": "1d4",
          "skill_ranks": 2
        }
      }
    },
    {
      "id": "retainer",
      "name": "Retainer",
      "isAvailable": true,
      "abilities": [],
      "skillIds": [
        "athletics"
      ],
      "prerequisites": [],
      "willpower_advancement": "none",
      "hit_die": "1d4",
      "baseValues": {
        "1": {
          "defense": 0,
          "attack": "1d4",
          "skill_ranks": 1
        },
        "2": {
          "defense": 0,
          "attack": "1d4",
          "skill_ranks": 1
        },
        "3": {
          "defense": 0,
          "attack": "1d4",
          "skill_ranks": 1
        },
        "4": {
          "defense": 0,
          "attack": "1d4",
          "skill_ranks": 1
        },
        "5": {
          "defense": 0,
          "attack": "1d4",
          "skill_ranks": 1
        },
        "6": {
          "defense": 0,
          "attack": "1d4",
          "skill_ranks": 1
        },
        "7": {
          "defense": 0,
          "attack": "1d4",
          "skill_ranks": 1
        }
      }
    }
  ],
  "skills": [
    {
      "id": "stealth",
      "name": "Stealth",
      "associatedStatId": "dexterity"
    },
    {
      "id": "athletics",
      "name": "Athletics",
      "associatedStatId": "strength"
    },
    {
      "id": "lore",
      "name": "Lore",
      "associatedStatId": "intelligence"
    },
    {
      "id": "charm",
      "name": "Charm",
      "associatedStatId": "charisma"
    }
  ],
  "skill_levels": [
    {
      "id": "untrained",
      "name": "Untrained",
      "bonus": 0,
      "class_skill_min_level": 1,
      "non_class_skill_min_level": 1,
      "order": 0,
      "cost": 0
    },
    {
      "id": "skilled",
      "name": "Skilled",
      "bonus": 2,
      "class_skill_min_level": 1,
      "non_class_skill_min_level": 1,
      "order": 1,
      "cost": 1
    },
    {
      "id": "trained",
      "name": "Trained",
      "bonus": 4,
      "class_skill_min_level": 3,
      "non_class_skill_min_level": 5,
      "order": 2,
      "cost": 2
    },
    {
      "id": "expert",
      "name": "Expert",
      "bonus": 6,
      "class_skill_min_level": 5,
      "non_class_skill_min_level": 7,
      "order": 3,
      "cost": 3
    }
  ],
  "derived_stats": [
    {
      "id": "defense",
      "name": "Defense",
      "type": "DEFENSE",
      "formula": "base + dex_mod",
      "variables": [
        "base",
        "dex_mod"
      ],
      "overrides": [
        {
          "classId": "warrior",
          "abilityName": "Shield Wall",
          "minLevel": 3,
          "newFormula": "base + con_mod + 1",
          "newVariables": [
            "base",
            "con_mod"
          ]
        }
      ]
    },
    {
      "id": "attack",
      "name": "Attack",
      "type": "NON-CALCULATED"
    }
  ],
  "initiative_chart": {
    "initiativeDice": [
      {
        "modifier": -2,
        "diceRolled": "1d4"
      },
      {
        "modifier": -1,
        "diceRolled": "1d4"
      },
      {
        "modifier": 0,
        "diceRolled": "1d6"
      },
      {
        "modifier": 1,
        "diceRolled": "1d6"
      },
      {
        "modifier": 2,
        "diceRolled": "1d8"
      },
      {
        "modifier": 3,
        "diceRolled": "1d8"
      },
      {
        "modifier": 4,
        "diceRolled": "1d10"
      }
    ]
  }
}"#;
