//! Argument and parameter types used by Network service Commands and Responses

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NetworkRegistrationStat {
    /// • 0: not registered, the MT is not currently searching a new operator to register to
    NotRegistered,
    /// • 1: registered, home network
    Registered,
    /// • 2: not registered, but the MT is currently searching a new operator to register to
    NotRegisteredSearching,
    /// • 3: registration denied
    RegistrationDenied,
    /// • 4: unknown (e.g. out of GERAN/UTRAN/E-UTRAN coverage)
    Unknown,
    /// • 5: registered, roaming
    RegisteredRoaming,
    /// • 6 and above: SMS only and CSFB variants, reported verbatim
    Other(u8),
}

impl From<u8> for NetworkRegistrationStat {
    fn from(stat: u8) -> Self {
        match stat {
            0 => Self::NotRegistered,
            1 => Self::Registered,
            2 => Self::NotRegisteredSearching,
            3 => Self::RegistrationDenied,
            4 => Self::Unknown,
            5 => Self::RegisteredRoaming,
            n => Self::Other(n),
        }
    }
}

impl NetworkRegistrationStat {
    pub fn is_registered(self) -> bool {
        matches!(self, Self::Registered | Self::RegisteredRoaming)
    }
}

/// Network operator as reported by `+COPS` in numeric format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Operator {
    /// MCC and MNC digits as one number, e.g. 24201
    pub code: u32,
    /// Radio access technology, when the module reports it
    pub rat: Option<u8>,
}

impl Operator {
    /// Operator and RAT packed the way host firmware usually stores it: the
    /// RAT in the top byte.
    pub fn packed(&self) -> u32 {
        self.code | (u32::from(self.rat.unwrap_or(0)) << 24)
    }
}
