//! Profile page: the caller's profile form and their checked-out carts.

use futures_util::future::join;

use super::{ensure_signed_in, AppContext};
use crate::gateway::models::{Cart, ProfileForm};
use crate::pagination::Pagination;
use crate::view::{Ack, HasStatus, Settled, ViewCell, ViewScope, ViewStatus};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileState {
    /// The form being edited.
    pub profile: ProfileForm,
    /// Last version known to the gateway, used for the dirty check.
    pub initial_profile: ProfileForm,
    pub carts: Vec<Cart>,
    pub pagination: Pagination,
    pub status: ViewStatus,
}

impl ProfileState {
    pub fn is_dirty(&self) -> bool {
        self.profile != self.initial_profile
    }

    pub fn page(&self) -> &[Cart] {
        self.pagination.page(&self.carts)
    }

    pub fn page_array(&self) -> Vec<usize> {
        self.pagination.page_array(self.carts.len())
    }
}

impl HasStatus for ProfileState {
    fn status(&self) -> &ViewStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut ViewStatus {
        &mut self.status
    }
}

#[derive(Clone)]
pub struct ProfileController {
    ctx: AppContext,
    scope: ViewScope,
    view: ViewCell<ProfileState>,
}

impl ProfileController {
    pub fn new(ctx: AppContext) -> Self {
        let view = ViewCell::new(ProfileState {
            pagination: ctx.pagination(),
            ..Default::default()
        });
        Self {
            ctx,
            scope: ViewScope::new(),
            view,
        }
    }

    pub fn state(&self) -> ProfileState {
        self.view.snapshot()
    }

    pub fn teardown(&self) {
        self.scope.teardown();
    }

    /// Page entry. The profile waits for a sign-in if needed; the cart
    /// listing is issued straight away and may finish first.
    pub async fn init(&self) -> (Option<Settled>, Settled) {
        let profile = async {
            if ensure_signed_in(&self.scope, &self.ctx.session).await {
                Some(self.load_profile().await)
            } else {
                None
            }
        };
        join(profile, self.load_carts()).await
    }

    async fn load_profile(&self) -> Settled {
        self.view.update(|s| s.profile = ProfileForm::default());
        self.view
            .reconcile(
                &self.scope,
                &self.ctx.session,
                "profile",
                "Failed to get the profile",
                self.ctx.api.get_profile(),
                |s, profile| {
                    if let Some(profile) = profile {
                        s.profile = ProfileForm::from(&profile);
                        s.initial_profile = s.profile.clone();
                    }
                    Ack::quiet()
                },
            )
            .await
    }

    async fn load_carts(&self) -> Settled {
        self.view
            .reconcile(
                &self.scope,
                &self.ctx.session,
                "carts",
                "Failed to query the cart created",
                self.ctx.api.get_cart_created(),
                |s, carts| {
                    s.carts = carts;
                    s.pagination.current_page = 0;
                    Ack::listed("DONE")
                },
            )
            .await
    }

    pub fn edit_profile(&self, edit: impl FnOnce(&mut ProfileForm)) {
        self.view.update(|s| edit(&mut s.profile));
    }

    pub fn go_to_page(&self, page: usize) -> bool {
        self.view.update(|s| {
            let len = s.carts.len();
            s.pagination.go_to(page, len)
        })
    }

    pub async fn save_profile(&self) -> Settled {
        let form = self.view.read(|s| s.profile.clone());
        self.view
            .reconcile(
                &self.scope,
                &self.ctx.session,
                "profile",
                "Failed to update a profile",
                self.ctx.api.save_profile(&form),
                |s, saved| {
                    s.initial_profile = ProfileForm::from(&saved);
                    Ack::success("The profile has been updated")
                },
            )
            .await
    }
}
