// src/core/info/art.rs

//! The decorative payload chosen by the parity of the current minute.

const IRENE_ART: &str = concat!(
    "    @@#       #@@      \n",
    "   @@@#       #@@@     \n",
    "  @@@@  %###%  @@@@    \n",
    " @@@@@  %***%  @@@@@   \n",
    "@@@@@@@@@@@@@@@@@@@@@@  \n",
    "@@@                @@@  \n",
    "@@  ***       ***  @@  \n",
    "@@     @@@@@@@     @@  \n",
    "@@     @  =  @     @@  \n",
    "@@       ---       @@  \n",
    " @@@             @@@   \n",
    "  @@@@         @@@@    \n",
    "    @@@@@@@@@@@@@      ",
);

const MAEKO_ART: &str = concat!(
    "        @@@@@@@@        \n",
    "      @@@%%%%%%@@@      \n",
    "     @@%%%%%%%%%@@      \n",
    "   @@@             @@@  \n",
    "  @@  ---   ---     @@  \n",
    " @@   ---   ---      @@ \n",
    " @@      ***         @@ \n",
    " @@       o          @@ \n",
    " @@                  @@ \n",
    "  @@               @@   \n",
    "   @@@           @@@    \n",
    "     @@@@@@@@@@@@@      \n",
    "     @@%%%%%%%%%@@      \n",
    "    @@%%%%%%%%%%%@@     \n",
    "   @@%%%%%%%%%%%%%@@    \n",
    "   @@             @@    \n",
    "   @@             @@    ",
);

/// The two characters; odd minutes belong to Irene, even minutes to Maeko.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Character {
    Irene,
    Maeko,
}

impl Character {
    pub fn for_minute(minute: u32) -> Self {
        if minute % 2 == 1 {
            Character::Irene
        } else {
            Character::Maeko
        }
    }

    /// Multi-line art, rows joined by `\n` with no trailing newline.
    pub fn art(self) -> &'static str {
        match self {
            Character::Irene => IRENE_ART,
            Character::Maeko => MAEKO_ART,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Character::Irene => "The minute is odd! Irene is odd!",
            Character::Maeko => "The minute is even! Maeko is going to get even!",
        }
    }
}
