/// Default UART rate the modem is switched to during attach.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Number of `AT` commands sent while the modem autobauds.
pub const DEFAULT_AUTOBAUD_ATTEMPTS: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Apn<'a> {
    None,
    Given {
        name: &'a str,
        username: Option<&'a str>,
        password: Option<&'a str>,
    },
}

impl Default for Apn<'_> {
    fn default() -> Self {
        Self::None
    }
}

impl<'a> Apn<'a> {
    /// Access point name to hand to the modem. An empty name lets the network
    /// pick its default APN.
    pub fn name(&self) -> &'a str {
        match *self {
            Apn::None => "",
            Apn::Given { name, .. } => name,
        }
    }

    pub fn credentials(&self) -> Option<(&'a str, &'a str)> {
        match *self {
            Apn::Given {
                username: Some(user),
                password,
                ..
            } => Some((user, password.unwrap_or(""))),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config<'a> {
    pub(crate) apn: Apn<'a>,
    pub(crate) baud_rate: u32,
    pub(crate) autobaud_attempts: u8,
    pub(crate) sms_service_center: Option<&'a str>,
}

impl Default for Config<'_> {
    fn default() -> Self {
        Self {
            apn: Apn::None,
            baud_rate: DEFAULT_BAUD_RATE,
            autobaud_attempts: DEFAULT_AUTOBAUD_ATTEMPTS,
            sms_service_center: None,
        }
    }
}

impl<'a> Config<'a> {
    pub fn new(apn: &'a str) -> Self {
        Config {
            apn: Apn::Given {
                name: apn,
                username: None,
                password: None,
            },
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_apn(self, apn: Apn<'a>) -> Self {
        Config { apn, ..self }
    }

    #[must_use]
    pub fn with_credentials(self, username: &'a str, password: &'a str) -> Self {
        let apn = Apn::Given {
            name: self.apn.name(),
            username: Some(username),
            password: Some(password),
        };
        Config { apn, ..self }
    }

    #[must_use]
    pub fn baud_rate(self, baud_rate: u32) -> Self {
        Config { baud_rate, ..self }
    }

    #[must_use]
    pub fn autobaud_attempts(self, autobaud_attempts: u8) -> Self {
        Config {
            autobaud_attempts,
            ..self
        }
    }

    /// Service center address configured before each outgoing SMS.
    #[must_use]
    pub fn with_sms_service_center(self, number: &'a str) -> Self {
        Config {
            sms_service_center: Some(number),
            ..self
        }
    }

    pub fn apn(&self) -> &Apn<'a> {
        &self.apn
    }
}
