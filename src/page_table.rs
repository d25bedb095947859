//! Page Table - Which setup pages exist, in which order, and which to skip

use crate::config::SkipList;
use std::fmt;
use std::str::FromStr;

/// Identifier of every setup page the wizard knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageId {
    Language,
    Keyboard,
    Eula,
    Network,
    Account,
    Location,
    Summary,
}

impl PageId {
    /// All pages in presentation order
    pub const ALL: [PageId; 7] = [
        PageId::Language,
        PageId::Keyboard,
        PageId::Eula,
        PageId::Network,
        PageId::Account,
        PageId::Location,
        PageId::Summary,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PageId::Language => "language",
            PageId::Keyboard => "keyboard",
            PageId::Eula => "eula",
            PageId::Network => "network",
            PageId::Account => "account",
            PageId::Location => "location",
            PageId::Summary => "summary",
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PageId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown page id: {}", s))
    }
}

/// Who the wizard is running for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetupMode {
    /// Fresh system, running as the dedicated setup account
    #[default]
    NewUser,

    /// An account already exists; system-wide pages are skipped
    ExistingUser,
}

/// Pages that configure the system rather than the user session
pub const SYSTEM_SETUP_PAGES: [PageId; 3] = [PageId::Account, PageId::Eula, PageId::Location];

/// Whether a page must be left out of the wizard
pub fn should_skip(mode: SetupMode, id: PageId, skip: &SkipList) -> bool {
    if skip.contains(id) {
        return true;
    }

    match mode {
        SetupMode::ExistingUser => SYSTEM_SETUP_PAGES.contains(&id),
        SetupMode::NewUser => false,
    }
}

/// Pages to construct, optionally only those after `after`
pub fn plan(mode: SetupMode, skip: &SkipList, after: Option<PageId>) -> Vec<PageId> {
    let start = match after {
        Some(after) => PageId::ALL
            .iter()
            .position(|id| *id == after)
            .map_or(PageId::ALL.len(), |index| index + 1),
        None => 0,
    };

    PageId::ALL[start..]
        .iter()
        .copied()
        .filter(|id| !should_skip(mode, *id, skip))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_id_round_trip_names() {
        assert_eq!("location".parse::<PageId>().unwrap(), PageId::Location);
        assert_eq!(PageId::Eula.to_string(), "eula");
        assert!("display".parse::<PageId>().is_err());
    }

    #[test]
    fn test_new_user_gets_every_page() {
        let pages = plan(SetupMode::NewUser, &SkipList::default(), None);
        assert_eq!(pages, PageId::ALL.to_vec());
    }

    #[test]
    fn test_existing_user_skips_system_pages() {
        let pages = plan(SetupMode::ExistingUser, &SkipList::default(), None);
        assert_eq!(
            pages,
            vec![PageId::Language, PageId::Keyboard, PageId::Network, PageId::Summary]
        );
    }

    #[test]
    fn test_skip_list_is_honoured() {
        let skip = SkipList::from_ids(["network", "keyboard"]);
        assert!(should_skip(SetupMode::NewUser, PageId::Network, &skip));
        assert!(!should_skip(SetupMode::NewUser, PageId::Account, &skip));

        let pages = plan(SetupMode::NewUser, &skip, None);
        assert!(!pages.contains(&PageId::Network));
        assert!(!pages.contains(&PageId::Keyboard));
    }

    #[test]
    fn test_plan_after_current_page() {
        let pages = plan(SetupMode::NewUser, &SkipList::default(), Some(PageId::Location));
        assert_eq!(pages, vec![PageId::Summary]);

        let pages = plan(SetupMode::NewUser, &SkipList::default(), Some(PageId::Summary));
        assert!(pages.is_empty());
    }
}
