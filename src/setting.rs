use crate::Error;
use crate::Result;
use config::{Config, Environment, File, FileFormat};
use notify::{event::ModifyKind, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    ops::Deref,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{error, info};

pub const CARGO_PKG_VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");

/// number of threads config
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Thread {
    /// number of http server threads
    pub http: usize,
}

/// network config
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Network {
    /// server bind host
    pub host: String,
    /// server bind port
    pub port: u16,

    /// serve the bundled ui from this directory when set
    pub static_dir: Option<PathBuf>,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            static_dir: None,
        }
    }
}

/// festival identity, shown on the public page and stamped
/// into the exported report filename
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct FestivalEvent {
    pub name: String,
    pub organizer: Option<String>,
}

impl Default for FestivalEvent {
    fn default() -> Self {
        Self {
            name: "festival".to_owned(),
            organizer: None,
        }
    }
}

/// auth config
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Auth {
    /// auth secret
    pub secret: String,

    /// jwt refresh token expiry in seconds
    pub refresh_token_expiry: usize,

    /// jwt access token expiry in seconds
    pub access_token_expiry: usize,
}

impl Default for Auth {
    fn default() -> Self {
        Self {
            secret: "test".to_owned(),
            refresh_token_expiry: 7 * 24 * 60 * 60,
            access_token_expiry: 2 * 24 * 60 * 60,
        }
    }
}

/// admin account rules
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Admin {
    /// how many approved admin accounts may exist at once
    pub max_approved: u64,
}

impl Default for Admin {
    fn default() -> Self {
        Self { max_approved: 6 }
    }
}

/// upi payee config for the donation qr
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Upi {
    /// virtual payment address, qr endpoint is disabled when empty
    pub vpa: String,
    pub payee_name: String,
}

impl Upi {
    pub fn configured(&self) -> bool {
        !self.vpa.is_empty()
    }
}

/// activity journal config
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Activity {
    /// journal file path
    pub path: PathBuf,
    /// entries kept before the oldest are dropped
    pub capacity: usize,
}

impl Default for Activity {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./activity.json"),
            capacity: 100,
        }
    }
}

/// announcement rotation config
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Announcement {
    /// seconds each active announcement stays on screen
    pub rotate_secs: u64,
}

impl Default for Announcement {
    fn default() -> Self {
        Self { rotate_secs: 8 }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Setting {
    /// database url
    /// https://www.sea-ql.org/SeaORM/docs/install-and-config/connection/
    pub db_url: String,

    pub thread: Thread,
    pub network: Network,

    pub event: FestivalEvent,

    pub auth: Auth,
    pub admin: Admin,
    pub upi: Upi,
    pub activity: Activity,
    pub announcement: Announcement,
}

impl Default for Setting {
    fn default() -> Self {
        Self {
            db_url: "sqlite://chandabox.sqlite".to_string(),
            thread: Default::default(),
            network: Default::default(),
            event: Default::default(),
            auth: Default::default(),
            admin: Default::default(),
            upi: Default::default(),
            activity: Default::default(),
            announcement: Default::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SettingWrapper {
    inner: Arc<RwLock<Setting>>,
    watcher: Option<Arc<RecommendedWatcher>>,
}

impl Deref for SettingWrapper {
    type Target = Arc<RwLock<Setting>>;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<Setting> for SettingWrapper {
    fn from(setting: Setting) -> Self {
        Self {
            inner: Arc::new(RwLock::new(setting)),
            watcher: None,
        }
    }
}

impl SettingWrapper {
    /// reload setting from file
    pub fn reload<P: AsRef<Path>>(&self, file: P, env_prefix: Option<String>) -> Result<()> {
        let setting = Setting::read(&file, env_prefix)?;
        {
            let mut w = self.write();
            *w = setting;
        }
        Ok(())
    }

    /// config from file and watch file update then reload
    pub fn watch<P: AsRef<Path>, F: Fn(&SettingWrapper) + Send + 'static>(
        file: P,
        env_prefix: Option<String>,
        f: F,
    ) -> Result<Self> {
        let mut setting: SettingWrapper = Setting::read(&file, env_prefix.clone())?.into();
        let c_setting = setting.clone();

        // symbolic links
        let file = fs::canonicalize(file.as_ref())?;
        let c_file = file.clone();

        // support vim editor. watch dir
        // https://docs.rs/notify/latest/notify/#editor-behaviour
        // https://github.com/notify-rs/notify/issues/113#issuecomment-281836995

        let dir = file
            .parent()
            .ok_or_else(|| Error::Message("failed to get config dir".to_owned()))?;

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| match result {
                Ok(event) => {
                    if matches!(event.kind, EventKind::Modify(ModifyKind::Data(_)))
                        && event.paths.contains(&c_file)
                    {
                        match c_setting.reload(&c_file, env_prefix.clone()) {
                            Ok(_) => {
                                info!("Reload config success {:?}", c_file);
                                info!("{:?}", c_setting.read());
                                f(&c_setting);
                            }
                            Err(e) => {
                                error!(
                                    error = e.to_string(),
                                    "failed to reload config {:?}", c_file
                                );
                            }
                        }
                    }
                }
                Err(e) => {
                    error!(error = e.to_string(), "failed to watch file {:?}", c_file);
                }
            },
            notify::Config::default(),
        )?;

        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        // save watcher
        setting.watcher = Some(Arc::new(watcher));

        Ok(setting)
    }
}

impl Setting {
    /// read config from file and env
    pub fn read<P: AsRef<Path>>(file: P, env_prefix: Option<String>) -> Result<Self> {
        let builder = Config::builder();
        let mut config = builder
            // Use serde default feature, ignore the following code
            // // use defaults
            // .add_source(Config::try_from(&Self::default())?)
            // override with file contents
            .add_source(File::with_name(file.as_ref().to_str().unwrap()));
        if let Some(prefix) = env_prefix {
            config = config.add_source(Self::env_source(&prefix));
        }

        let config = config.build()?;
        let mut setting: Setting = config.try_deserialize()?;
        setting.validate()?;
        Ok(setting)
    }

    fn env_source(prefix: &str) -> Environment {
        Environment::with_prefix(prefix)
            .try_parsing(true)
            .prefix_separator("_")
            .separator("__")
    }

    /// read config from env
    pub fn from_env(env_prefix: String) -> Result<Self> {
        let mut config = Config::builder();
        config = config.add_source(Self::env_source(&env_prefix));

        let config = config.build()?;
        let mut setting: Setting = config.try_deserialize()?;
        setting.validate()?;
        Ok(setting)
    }

    /// config from str
    pub fn from_str(s: &str, format: FileFormat) -> Result<Self> {
        let builder = Config::builder();
        let config = builder.add_source(File::from_str(s, format)).build()?;
        let mut setting: Setting = config.try_deserialize()?;
        setting.validate()?;
        Ok(setting)
    }

    fn validate(&mut self) -> Result<()> {
        if self.activity.capacity == 0 {
            return Err(Error::Str("activity.capacity must be at least 1"));
        }
        if self.admin.max_approved == 0 {
            return Err(Error::Str("admin.max_approved must be at least 1"));
        }
        Ok(())
    }
}
