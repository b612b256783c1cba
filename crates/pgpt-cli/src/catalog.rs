//! Declarative command catalog.
//!
//! Each server command is one [`CommandSpec`] row naming the flags it reads,
//! how each flag maps onto the JSON envelope, and which container receives
//! the fields. The envelope builder in [`crate::command`] is driven entirely
//! by these rows.

use serde::Serialize;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Flag carrying the authentication token.
pub(crate) const TOKEN_FLAG: &str = "--token";
/// Flag carrying the server host.
pub(crate) const SERVER_IP_FLAG: &str = "--server-ip";
/// Flag carrying the server port.
pub(crate) const SERVER_PORT_FLAG: &str = "--server-port";

/// Commands understood by the server.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    EnumString,
    Display,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub(crate) enum Command {
    /// Exchanges credentials for a token.
    Login,
    /// Invalidates a token.
    Logout,
    /// Starts a conversation.
    Chat,
    /// Adds a question to an existing conversation.
    ContinueChat,
    /// Fetches conversation metadata.
    GetChatInfo,
    /// Deletes a conversation.
    DeleteChat,
    /// Stores a new knowledge source.
    CreateSource,
    /// Fetches a knowledge source.
    GetSource,
    /// Lists the sources of a group.
    ListSources,
    /// Updates a knowledge source.
    EditSource,
    /// Deletes a knowledge source.
    DeleteSource,
    /// Lists the groups visible to the token.
    ListGroups,
    /// Creates a group.
    StoreGroup,
    /// Deletes a group.
    DeleteGroup,
    /// Creates a user.
    StoreUser,
    /// Updates selected fields of a user.
    EditUser,
    /// Deletes a user.
    DeleteUser,
    /// Derives a key from a password.
    Keygen,
}

impl Command {
    /// Returns the catalog row describing this command.
    pub(crate) fn spec(self) -> &'static CommandSpec {
        match self {
            Self::Login => &LOGIN,
            Self::Logout => &LOGOUT,
            Self::Chat => &CHAT,
            Self::ContinueChat => &CONTINUE_CHAT,
            Self::GetChatInfo => &GET_CHAT_INFO,
            Self::DeleteChat => &DELETE_CHAT,
            Self::CreateSource => &CREATE_SOURCE,
            Self::GetSource => &GET_SOURCE,
            Self::ListSources => &LIST_SOURCES,
            Self::EditSource => &EDIT_SOURCE,
            Self::DeleteSource => &DELETE_SOURCE,
            Self::ListGroups => &LIST_GROUPS,
            Self::StoreGroup => &STORE_GROUP,
            Self::DeleteGroup => &DELETE_GROUP,
            Self::StoreUser => &STORE_USER,
            Self::EditUser => &EDIT_USER,
            Self::DeleteUser => &DELETE_USER,
            Self::Keygen => &KEYGEN,
        }
    }

    /// Iterates the catalog in declaration order.
    pub(crate) fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }
}

/// Envelope member receiving a command's fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Container {
    Arguments,
    Attributes,
    /// Only `command` and `token` are sent.
    TopLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    Text,
    Flag,
    List,
}

/// How a missing or blank value is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Presence {
    Required,
    /// Substituted when the flag is absent.
    DefaultText(&'static str),
    /// Flags default to `false` and lists to `[]`; never omitted.
    Implicit,
    /// Omitted when absent or blank after trimming.
    Sparse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldSpec {
    pub(crate) key: &'static str,
    pub(crate) flag: &'static str,
    pub(crate) kind: FieldKind,
    pub(crate) presence: Presence,
}

impl FieldSpec {
    const fn required(key: &'static str, flag: &'static str) -> Self {
        Self {
            key,
            flag,
            kind: FieldKind::Text,
            presence: Presence::Required,
        }
    }

    const fn text_or(key: &'static str, flag: &'static str, default: &'static str) -> Self {
        Self {
            key,
            flag,
            kind: FieldKind::Text,
            presence: Presence::DefaultText(default),
        }
    }

    const fn sparse(key: &'static str, flag: &'static str) -> Self {
        Self {
            key,
            flag,
            kind: FieldKind::Text,
            presence: Presence::Sparse,
        }
    }

    const fn flag(key: &'static str, flag: &'static str) -> Self {
        Self {
            key,
            flag,
            kind: FieldKind::Flag,
            presence: Presence::Implicit,
        }
    }

    const fn list(key: &'static str, flag: &'static str) -> Self {
        Self {
            key,
            flag,
            kind: FieldKind::List,
            presence: Presence::Implicit,
        }
    }
}

#[derive(Debug)]
pub(crate) struct CommandSpec {
    pub(crate) command: Command,
    pub(crate) summary: &'static str,
    pub(crate) requires_token: bool,
    pub(crate) container: Container,
    pub(crate) fields: &'static [FieldSpec],
}

impl CommandSpec {
    /// Kind of value `flag` carries for this command, or `None` when the
    /// command does not read it.
    pub(crate) fn flag_kind(&self, flag: &str) -> Option<FieldKind> {
        if flag == SERVER_IP_FLAG
            || flag == SERVER_PORT_FLAG
            || (self.requires_token && flag == TOKEN_FLAG)
        {
            return Some(FieldKind::Text);
        }
        self.fields
            .iter()
            .find(|field| field.flag == flag)
            .map(|field| field.kind)
    }
}

static LOGIN: CommandSpec = CommandSpec {
    command: Command::Login,
    summary: "Exchange email and password for a session token",
    requires_token: false,
    container: Container::Arguments,
    fields: &[
        FieldSpec::required("email", "--email"),
        FieldSpec::required("password", "--password"),
    ],
};

static LOGOUT: CommandSpec = CommandSpec {
    command: Command::Logout,
    summary: "Invalidate a session token",
    requires_token: true,
    container: Container::TopLevel,
    fields: &[],
};

static CHAT: CommandSpec = CommandSpec {
    command: Command::Chat,
    summary: "Ask a question in a new conversation",
    requires_token: true,
    container: Container::Arguments,
    fields: &[
        FieldSpec::required("question", "--question"),
        FieldSpec::flag("usePublic", "--use-public"),
        FieldSpec::text_or("language", "--language", "de"),
        FieldSpec::list("groups", "--groups"),
    ],
};

static CONTINUE_CHAT: CommandSpec = CommandSpec {
    command: Command::ContinueChat,
    summary: "Ask a follow-up question in an existing conversation",
    requires_token: true,
    container: Container::Arguments,
    fields: &[
        FieldSpec::required("chatId", "--conversation-id"),
        FieldSpec::required("question", "--message"),
    ],
};

static GET_CHAT_INFO: CommandSpec = CommandSpec {
    command: Command::GetChatInfo,
    summary: "Show conversation metadata",
    requires_token: true,
    container: Container::Arguments,
    fields: &[FieldSpec::required("chatId", "--chat-id")],
};

static DELETE_CHAT: CommandSpec = CommandSpec {
    command: Command::DeleteChat,
    summary: "Delete a conversation",
    requires_token: true,
    container: Container::Arguments,
    fields: &[FieldSpec::required("chatId", "--chat-id")],
};

static CREATE_SOURCE: CommandSpec = CommandSpec {
    command: Command::CreateSource,
    summary: "Store a new markdown source",
    requires_token: true,
    container: Container::Arguments,
    fields: &[
        FieldSpec::required("name", "--name"),
        FieldSpec::required("content", "--content"),
        FieldSpec::list("groups", "--groups"),
    ],
};

static GET_SOURCE: CommandSpec = CommandSpec {
    command: Command::GetSource,
    summary: "Fetch a source",
    requires_token: true,
    container: Container::Arguments,
    fields: &[FieldSpec::required("sourceId", "--source-id")],
};

static LIST_SOURCES: CommandSpec = CommandSpec {
    command: Command::ListSources,
    summary: "List the sources of a group",
    requires_token: true,
    container: Container::Attributes,
    fields: &[FieldSpec::required("groupName", "--group-name")],
};

static EDIT_SOURCE: CommandSpec = CommandSpec {
    command: Command::EditSource,
    summary: "Update the title, content, or groups of a source",
    requires_token: true,
    container: Container::Arguments,
    fields: &[
        FieldSpec::required("sourceId", "--source-id"),
        FieldSpec::sparse("title", "--title"),
        FieldSpec::sparse("content", "--content"),
        FieldSpec::list("groups", "--groups"),
    ],
};

static DELETE_SOURCE: CommandSpec = CommandSpec {
    command: Command::DeleteSource,
    summary: "Delete a source",
    requires_token: true,
    container: Container::Arguments,
    fields: &[FieldSpec::required("sourceId", "--source-id")],
};

static LIST_GROUPS: CommandSpec = CommandSpec {
    command: Command::ListGroups,
    summary: "List groups",
    requires_token: true,
    container: Container::TopLevel,
    fields: &[],
};

static STORE_GROUP: CommandSpec = CommandSpec {
    command: Command::StoreGroup,
    summary: "Create a group",
    requires_token: true,
    container: Container::Arguments,
    fields: &[
        FieldSpec::required("groupName", "--group-name"),
        FieldSpec::text_or("description", "--description", ""),
    ],
};

static DELETE_GROUP: CommandSpec = CommandSpec {
    command: Command::DeleteGroup,
    summary: "Delete a group",
    requires_token: true,
    container: Container::Arguments,
    fields: &[FieldSpec::required("groupName", "--group-name")],
};

static STORE_USER: CommandSpec = CommandSpec {
    command: Command::StoreUser,
    summary: "Create a user",
    requires_token: true,
    container: Container::Arguments,
    fields: &[
        FieldSpec::required("name", "--name"),
        FieldSpec::required("email", "--email"),
        FieldSpec::required("password", "--password"),
        FieldSpec::text_or("language", "--language", "en"),
        FieldSpec::text_or("timezone", "--timezone", "Europe/Berlin"),
        FieldSpec::list("roles", "--roles"),
        FieldSpec::list("groups", "--groups"),
        FieldSpec::flag("usePublic", "--usePublic"),
        FieldSpec::flag("activateFtp", "--activateFtp"),
        FieldSpec::text_or("ftpPassword", "--ftpPassword", ""),
    ],
};

static EDIT_USER: CommandSpec = CommandSpec {
    command: Command::EditUser,
    summary: "Update selected fields of a user",
    requires_token: true,
    container: Container::Arguments,
    fields: &[
        FieldSpec::required("userId", "--user-id"),
        FieldSpec::sparse("name", "--name"),
        FieldSpec::sparse("email", "--email"),
        FieldSpec::sparse("password", "--password"),
        FieldSpec::sparse("language", "--language"),
        FieldSpec::sparse("timezone", "--timezone"),
        FieldSpec::list("roles", "--roles"),
        FieldSpec::list("groups", "--groups"),
        FieldSpec::flag("usePublic", "--usePublic"),
        FieldSpec::flag("activateFtp", "--activateFtp"),
        FieldSpec::sparse("ftpPassword", "--ftpPassword"),
    ],
};

static DELETE_USER: CommandSpec = CommandSpec {
    command: Command::DeleteUser,
    summary: "Delete a user",
    requires_token: true,
    container: Container::Arguments,
    fields: &[FieldSpec::required("email", "--email")],
};

static KEYGEN: CommandSpec = CommandSpec {
    command: Command::Keygen,
    summary: "Derive a key from a password",
    requires_token: true,
    container: Container::Arguments,
    fields: &[FieldSpec::required("password", "--password")],
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::str::FromStr;

    #[test]
    fn every_row_describes_its_own_command() {
        for command in Command::all() {
            assert_eq!(command.spec().command, command);
        }
    }

    #[test]
    fn only_login_runs_without_a_token() {
        let anonymous: Vec<Command> = Command::all()
            .filter(|command| !command.spec().requires_token)
            .collect();
        assert_eq!(anonymous, vec![Command::Login]);
    }

    #[test]
    fn command_names_are_exact_and_case_sensitive() {
        assert_eq!(
            Command::from_str("continue_chat").expect("known command"),
            Command::ContinueChat
        );
        assert!(Command::from_str("Continue_Chat").is_err());
        assert_eq!(Command::GetChatInfo.to_string(), "get_chat_info");
    }

    #[test]
    fn flag_kinds_follow_the_row() {
        let chat = Command::Chat.spec();
        assert_eq!(chat.flag_kind(TOKEN_FLAG), Some(FieldKind::Text));
        assert_eq!(chat.flag_kind("--question"), Some(FieldKind::Text));
        assert_eq!(chat.flag_kind("--use-public"), Some(FieldKind::Flag));
        assert_eq!(chat.flag_kind("--groups"), Some(FieldKind::List));
        assert_eq!(chat.flag_kind("--email"), None);
        assert_eq!(Command::Login.spec().flag_kind(TOKEN_FLAG), None);
    }

    #[test]
    fn flags_are_unique_within_each_command() {
        for command in Command::all() {
            let mut seen = HashSet::new();
            for field in command.spec().fields {
                assert!(
                    seen.insert(field.flag),
                    "{command} declares {} twice",
                    field.flag
                );
            }
        }
    }

    #[test]
    fn fields_never_collide_with_connection_flags() {
        for command in Command::all() {
            for field in command.spec().fields {
                assert!(
                    ![TOKEN_FLAG, SERVER_IP_FLAG, SERVER_PORT_FLAG].contains(&field.flag),
                    "{command} reuses reserved flag {}",
                    field.flag
                );
            }
        }
    }

    #[test]
    fn catalog_lists_eighteen_commands() {
        assert_eq!(Command::all().count(), 18);
    }
}
