//! Dependent-control rules.
//!
//! Every enable/disable/mirror relationship between controls lives in one
//! declarative table; [`refresh`] replays the table against the current
//! values so the same pass serves interactive edits, restores and bulk
//! operations alike.

use crate::choices::OTHER_TOKEN;
use crate::controls::{Control, ControlSet, keys};

/// Predicate on the controller control.
enum Condition {
    Checked,
    Unchecked,
    Selected(&'static str),
    NotSelected(&'static str),
    Unselected,
    MemberChecked(&'static str),
    MemberUnchecked(&'static str),
}

/// State imposed on a dependent control while the condition holds.
enum Effect {
    Enable(&'static str),
    DisableClearing(&'static str),
    DisableKeeping(&'static str),
    Mirror {
        source: &'static str,
        target: &'static str,
    },
    RestrictOptions {
        group: &'static str,
        allowed: &'static [&'static str],
    },
    ForceSelection {
        group: &'static str,
        token: &'static str,
    },
    DropSelection {
        group: &'static str,
        token: &'static str,
    },
    ClearSelection {
        group: &'static str,
    },
}

struct DependencyRule {
    controller: &'static str,
    when: Condition,
    effects: &'static [Effect],
}

const RULES: &[DependencyRule] = &[
    // 3a: the home address mirrors the transferee address while "same as 2"
    // is checked, and only becomes editable once it is unchecked.
    DependencyRule {
        controller: keys::Q3A_SAME_AS_2,
        when: Condition::Checked,
        effects: &[
            Effect::Mirror {
                source: keys::Q2_ADDRESS,
                target: keys::Q3A_HOME_ADDRESS,
            },
            Effect::DisableKeeping(keys::Q3A_HOME_ADDRESS),
        ],
    },
    DependencyRule {
        controller: keys::Q3A_SAME_AS_2,
        when: Condition::Unchecked,
        effects: &[Effect::Enable(keys::Q3A_HOME_ADDRESS)],
    },
    // 4a: the free-text description only exists for the OTHER firearm type.
    DependencyRule {
        controller: keys::Q4A_FIREARM_TYPE,
        when: Condition::Selected(OTHER_TOKEN),
        effects: &[Effect::Enable(keys::Q4A_FIREARM_TYPE_OTHER)],
    },
    DependencyRule {
        controller: keys::Q4A_FIREARM_TYPE,
        when: Condition::NotSelected(OTHER_TOKEN),
        effects: &[Effect::DisableClearing(keys::Q4A_FIREARM_TYPE_OTHER)],
    },
    // 6m.2 tracks 6m.1: YES opens the YES/NO answers, NO forces N/A, and an
    // unanswered 6m.1 locks the whole exception row.
    DependencyRule {
        controller: keys::Q6M1_NONIMMIGRANT,
        when: Condition::Selected("YES"),
        effects: &[
            Effect::RestrictOptions {
                group: keys::Q6M2_EXCEPTION,
                allowed: &["YES", "NO"],
            },
            Effect::DropSelection {
                group: keys::Q6M2_EXCEPTION,
                token: "N/A",
            },
        ],
    },
    DependencyRule {
        controller: keys::Q6M1_NONIMMIGRANT,
        when: Condition::Selected("NO"),
        effects: &[
            Effect::RestrictOptions {
                group: keys::Q6M2_EXCEPTION,
                allowed: &["N/A"],
            },
            Effect::ForceSelection {
                group: keys::Q6M2_EXCEPTION,
                token: "N/A",
            },
        ],
    },
    DependencyRule {
        controller: keys::Q6M1_NONIMMIGRANT,
        when: Condition::Unselected,
        effects: &[
            Effect::RestrictOptions {
                group: keys::Q6M2_EXCEPTION,
                allowed: &[],
            },
            Effect::ClearSelection {
                group: keys::Q6M2_EXCEPTION,
            },
        ],
    },
    // 8: the UPIN number is only collected after an explicit YES.
    DependencyRule {
        controller: keys::Q8_HAS_UPIN,
        when: Condition::Selected("YES"),
        effects: &[Effect::Enable(keys::Q8_UPIN_NUMBER)],
    },
    DependencyRule {
        controller: keys::Q8_HAS_UPIN,
        when: Condition::NotSelected("YES"),
        effects: &[Effect::DisableClearing(keys::Q8_UPIN_NUMBER)],
    },
    // 9a / 9c: companion country text for the OTHER choices.
    DependencyRule {
        controller: keys::Q9A_CITIZENSHIP,
        when: Condition::MemberChecked(OTHER_TOKEN),
        effects: &[Effect::Enable(keys::Q9A_CITIZENSHIP_OTHER)],
    },
    DependencyRule {
        controller: keys::Q9A_CITIZENSHIP,
        when: Condition::MemberUnchecked(OTHER_TOKEN),
        effects: &[Effect::DisableClearing(keys::Q9A_CITIZENSHIP_OTHER)],
    },
    DependencyRule {
        controller: keys::Q9C_BIRTH_COUNTRY,
        when: Condition::Selected(OTHER_TOKEN),
        effects: &[Effect::Enable(keys::Q9C_BIRTH_COUNTRY_OTHER)],
    },
    DependencyRule {
        controller: keys::Q9C_BIRTH_COUNTRY,
        when: Condition::NotSelected(OTHER_TOKEN),
        effects: &[Effect::DisableClearing(keys::Q9C_BIRTH_COUNTRY_OTHER)],
    },
];

pub(crate) fn refresh(set: &mut ControlSet) {
    for rule in RULES {
        if holds(set, rule.controller, &rule.when) {
            for effect in rule.effects {
                apply(set, effect);
            }
        }
    }
}

fn holds(set: &ControlSet, controller: &str, condition: &Condition) -> bool {
    match condition {
        Condition::Checked => set.checkbox_checked(controller),
        Condition::Unchecked => !set.checkbox_checked(controller),
        Condition::Selected(token) => set.radio_selected(controller) == Some(*token),
        Condition::NotSelected(token) => set.radio_selected(controller) != Some(*token),
        Condition::Unselected => set.radio_selected(controller).is_none(),
        Condition::MemberChecked(token) => member_checked(set, controller, token),
        Condition::MemberUnchecked(token) => !member_checked(set, controller, token),
    }
}

fn member_checked(set: &ControlSet, key: &str, token: &str) -> bool {
    match set.get(key) {
        Some(Control::CheckGroup(group)) => group.checked.iter().any(|checked| checked == token),
        _ => false,
    }
}

fn apply(set: &mut ControlSet, effect: &Effect) {
    match effect {
        Effect::Enable(key) => set_enabled(set, key, true, false),
        Effect::DisableClearing(key) => set_enabled(set, key, false, true),
        Effect::DisableKeeping(key) => set_enabled(set, key, false, false),
        Effect::Mirror { source, target } => mirror_text(set, source, target),
        Effect::RestrictOptions { group, allowed } => restrict_options(set, group, allowed),
        Effect::ForceSelection { group, token } => force_selection(set, group, token),
        Effect::DropSelection { group, token } => drop_selection(set, group, token),
        Effect::ClearSelection { group } => clear_selection(set, group),
    }
}

fn set_enabled(set: &mut ControlSet, key: &str, enabled: bool, clear_on_disable: bool) {
    if let Some(Control::Text(control)) = set.get_mut(key) {
        control.disabled = !enabled;
        if !enabled && clear_on_disable {
            control.value.clear();
        }
    }
}

fn mirror_text(set: &mut ControlSet, source: &str, target: &str) {
    let value = match set.get(source) {
        Some(Control::Text(control)) => control.value.clone(),
        _ => return,
    };
    if let Some(Control::Text(control)) = set.get_mut(target) {
        control.value = value;
    }
}

fn restrict_options(set: &mut ControlSet, key: &str, allowed: &[&str]) {
    if let Some(Control::RadioGroup(group)) = set.get_mut(key) {
        group.disabled_options = group
            .options
            .iter()
            .filter(|option| !allowed.contains(&option.as_str()))
            .cloned()
            .collect();
    }
}

fn force_selection(set: &mut ControlSet, key: &str, token: &str) {
    if let Some(Control::RadioGroup(group)) = set.get_mut(key)
        && group.options.iter().any(|option| option == token)
    {
        group.selected = Some(token.to_string());
    }
}

fn drop_selection(set: &mut ControlSet, key: &str, token: &str) {
    if let Some(Control::RadioGroup(group)) = set.get_mut(key)
        && group.selected.as_deref() == Some(token)
    {
        group.selected = None;
    }
}

fn clear_selection(set: &mut ControlSet, key: &str) {
    if let Some(Control::RadioGroup(group)) = set.get_mut(key) {
        group.selected = None;
    }
}
