//! Text shown when an objective is reached

use super::target::TargetKind;
use crate::consts::MAX_LEVEL;

pub const FALLBACK_MESSAGE: &str = "Objetivo encontrado!";

pub const EARTH_MESSAGE: &str = "¡Llegaste al Planeta Tierra!";

const ANTOFAGASTA_TARGET: &str = "¡¡Amiga ten cuidado!! Has llegado a Antofagasta. Tierra de nadie, te recomiendo huyas de inmediato ☀🏜️";

const ANTOFAGASTA_ANNOUNCEMENT: &str =
    "Advertencia: has llegado a Antofagasta. Se recomienda huir inmediatamente ☀🏜️";
const POKEMON_ANNOUNCEMENT: &str = "¡Te felicito amiga, has encontrado la carta mas cara (Según chatgpt, no tengo puta idea) 🎴🔥";
const ODIN_ANNOUNCEMENT: &str =
    "¡Catalina! Has rescatado al gordito Odin! Es hora de volver a casa, nos esperan 💖";

/// Canonical capture text for a target kind
pub fn capture_message(kind: TargetKind) -> &'static str {
    match kind {
        TargetKind::Choripan => {
            "Encontraste el choripán espacial supremo… cuidado, este te deja repitiendo en 3 galaxias distintas"
        }
        TargetKind::Vino => {
            "Noooo… hallaste el vino chileno pero nivel interplanetario. Con una tonta copita estai pa mear a la abuela de la Nustas"
        }
        TargetKind::Antofagasta => "Llegaste a Antofagasta… cuidado con los peruanos (Tu gente)",
        TargetKind::Ticket => {
            "Pase libre pa’ cualquier concierto… excepto pa’ Milo J porque no estamos pa’ hueás."
        }
        TargetKind::Odin => "¡Rescataste a Odín! El diente malvado ha sido derrotado 🐶💫",
        TargetKind::Pokemon | TargetKind::Earth => FALLBACK_MESSAGE,
    }
}

/// Message attached to the objective when a level is built
pub fn target_message(kind: TargetKind) -> &'static str {
    match kind {
        TargetKind::Antofagasta => ANTOFAGASTA_TARGET,
        TargetKind::Earth => EARTH_MESSAGE,
        other => capture_message(other),
    }
}

/// Text shown on capture; special kinds override the objective's own message
pub fn announcement(kind: TargetKind, level: u32, objective_message: &str) -> &str {
    match kind {
        TargetKind::Antofagasta => ANTOFAGASTA_ANNOUNCEMENT,
        TargetKind::Pokemon => POKEMON_ANNOUNCEMENT,
        TargetKind::Odin => ODIN_ANNOUNCEMENT,
        _ if level == MAX_LEVEL && objective_message.is_empty() => EARTH_MESSAGE,
        _ if !objective_message.is_empty() => objective_message,
        other => capture_message(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_kinds_override() {
        let msg = announcement(TargetKind::Odin, 6, "ignored");
        assert!(msg.contains("gordito Odin"));
        assert!(announcement(TargetKind::Antofagasta, 4, target_message(TargetKind::Antofagasta))
            .starts_with("Advertencia"));
        assert!(announcement(TargetKind::Pokemon, 5, FALLBACK_MESSAGE).contains("carta mas cara"));
    }

    #[test]
    fn test_regular_and_final_messages() {
        let choripan = target_message(TargetKind::Choripan);
        assert_eq!(announcement(TargetKind::Choripan, 1, choripan), choripan);
        assert_eq!(announcement(TargetKind::Earth, MAX_LEVEL, ""), EARTH_MESSAGE);
        assert_eq!(announcement(TargetKind::Vino, 2, ""), capture_message(TargetKind::Vino));
        assert_eq!(capture_message(TargetKind::Pokemon), FALLBACK_MESSAGE);
    }
}
