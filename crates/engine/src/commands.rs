use uuid::Uuid;

use crate::{Role, TransactionKind};

/// Input for [`crate::Engine::register_user`].
#[derive(Clone, Debug)]
pub struct RegisterUserCmd {
    pub(crate) email: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) password: String,
}

impl RegisterUserCmd {
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            password: password.into(),
        }
    }
}

/// Input for [`crate::Engine::create_user`]. The account comes out
/// verified, so it can log in right away.
#[derive(Clone, Debug)]
pub struct CreateUserCmd {
    pub(crate) email: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) password: String,
    pub(crate) role: Role,
}

impl CreateUserCmd {
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            password: password.into(),
            role: Role::User,
        }
    }

    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

/// Input for [`crate::Engine::upsert_sso_user`], built from verified
/// identity-provider claims.
#[derive(Clone, Debug)]
pub struct SsoUserCmd {
    pub(crate) email: String,
    pub(crate) first_name: Option<String>,
    pub(crate) last_name: Option<String>,
    pub(crate) avatar: Option<String>,
    pub(crate) role: Option<Role>,
}

impl SsoUserCmd {
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            first_name: None,
            last_name: None,
            avatar: None,
            role: None,
        }
    }

    #[must_use]
    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    #[must_use]
    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    #[must_use]
    pub fn avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }
}

/// Input for [`crate::Engine::create_approve_list`].
#[derive(Clone, Debug)]
pub struct CreateApproveListCmd {
    pub(crate) url: String,
    pub(crate) title: String,
    pub(crate) detail: String,
    pub(crate) comment: Option<String>,
    pub(crate) id_from: Option<String>,
    pub(crate) api_path: Option<String>,
    pub(crate) status_approve_id: Option<i32>,
    pub(crate) config_id: Option<Uuid>,
    pub(crate) user_id: Option<Uuid>,
}

impl CreateApproveListCmd {
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            detail: detail.into(),
            comment: None,
            id_from: None,
            api_path: None,
            status_approve_id: None,
            config_id: None,
            user_id: None,
        }
    }

    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    #[must_use]
    pub fn id_from(mut self, id_from: impl Into<String>) -> Self {
        self.id_from = Some(id_from.into());
        self
    }

    #[must_use]
    pub fn api_path(mut self, api_path: impl Into<String>) -> Self {
        self.api_path = Some(api_path.into());
        self
    }

    #[must_use]
    pub fn status_approve_id(mut self, status_approve_id: i32) -> Self {
        self.status_approve_id = Some(status_approve_id);
        self
    }

    #[must_use]
    pub fn config_id(mut self, config_id: Uuid) -> Self {
        self.config_id = Some(config_id);
        self
    }

    #[must_use]
    pub fn user_id(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

/// Input for [`crate::Engine::update_approve_list`]. `api_path` and
/// `id_from` only override the stored callback target, they are not
/// persisted.
#[derive(Clone, Debug)]
pub struct UpdateApproveListCmd {
    pub(crate) approve_list_id: Uuid,
    pub(crate) comment: Option<String>,
    pub(crate) status_approve_id: Option<i32>,
    pub(crate) api_path: Option<String>,
    pub(crate) id_from: Option<String>,
}

impl UpdateApproveListCmd {
    #[must_use]
    pub fn new(approve_list_id: Uuid) -> Self {
        Self {
            approve_list_id,
            comment: None,
            status_approve_id: None,
            api_path: None,
            id_from: None,
        }
    }

    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    #[must_use]
    pub fn status_approve_id(mut self, status_approve_id: i32) -> Self {
        self.status_approve_id = Some(status_approve_id);
        self
    }

    #[must_use]
    pub fn api_path(mut self, api_path: impl Into<String>) -> Self {
        self.api_path = Some(api_path.into());
        self
    }

    #[must_use]
    pub fn id_from(mut self, id_from: impl Into<String>) -> Self {
        self.id_from = Some(id_from.into());
        self
    }
}

/// A line item for a new or replaced transaction.
#[derive(Clone, Debug)]
pub struct TransactionItemNew {
    pub(crate) name: String,
    pub(crate) amount: i64,
}

impl TransactionItemNew {
    #[must_use]
    pub fn new(name: impl Into<String>, amount: i64) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }
}

/// An uploaded receipt for a new or replaced transaction.
#[derive(Clone, Debug)]
pub struct TransactionFileNew {
    pub(crate) url: String,
    pub(crate) public_id: String,
}

impl TransactionFileNew {
    #[must_use]
    pub fn new(url: impl Into<String>, public_id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            public_id: public_id.into(),
        }
    }
}

/// Input for [`crate::Engine::create_transaction`].
#[derive(Clone, Debug)]
pub struct CreateTransactionCmd {
    pub(crate) title: String,
    pub(crate) note: Option<String>,
    pub(crate) kind: TransactionKind,
    pub(crate) items: Vec<TransactionItemNew>,
    pub(crate) files: Vec<TransactionFileNew>,
    pub(crate) created_by: Uuid,
}

impl CreateTransactionCmd {
    #[must_use]
    pub fn new(title: impl Into<String>, kind: TransactionKind, created_by: Uuid) -> Self {
        Self {
            title: title.into(),
            note: None,
            kind,
            items: Vec::new(),
            files: Vec::new(),
            created_by,
        }
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn items(mut self, items: Vec<TransactionItemNew>) -> Self {
        self.items = items;
        self
    }

    #[must_use]
    pub fn item(mut self, name: impl Into<String>, amount: i64) -> Self {
        self.items.push(TransactionItemNew::new(name, amount));
        self
    }

    #[must_use]
    pub fn files(mut self, files: Vec<TransactionFileNew>) -> Self {
        self.files = files;
        self
    }

    #[must_use]
    pub fn file(mut self, url: impl Into<String>, public_id: impl Into<String>) -> Self {
        self.files.push(TransactionFileNew::new(url, public_id));
        self
    }
}

/// Input for [`crate::Engine::update_transaction`]. Items and files
/// replace the stored ones wholesale.
#[derive(Clone, Debug)]
pub struct UpdateTransactionCmd {
    pub(crate) transaction_id: Uuid,
    pub(crate) user_id: Uuid,
    pub(crate) title: String,
    pub(crate) note: Option<String>,
    pub(crate) kind: TransactionKind,
    pub(crate) items: Vec<TransactionItemNew>,
    pub(crate) files: Vec<TransactionFileNew>,
}

impl UpdateTransactionCmd {
    #[must_use]
    pub fn new(
        transaction_id: Uuid,
        user_id: Uuid,
        title: impl Into<String>,
        kind: TransactionKind,
    ) -> Self {
        Self {
            transaction_id,
            user_id,
            title: title.into(),
            note: None,
            kind,
            items: Vec::new(),
            files: Vec::new(),
        }
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn items(mut self, items: Vec<TransactionItemNew>) -> Self {
        self.items = items;
        self
    }

    #[must_use]
    pub fn item(mut self, name: impl Into<String>, amount: i64) -> Self {
        self.items.push(TransactionItemNew::new(name, amount));
        self
    }

    #[must_use]
    pub fn files(mut self, files: Vec<TransactionFileNew>) -> Self {
        self.files = files;
        self
    }

    #[must_use]
    pub fn file(mut self, url: impl Into<String>, public_id: impl Into<String>) -> Self {
        self.files.push(TransactionFileNew::new(url, public_id));
        self
    }
}
