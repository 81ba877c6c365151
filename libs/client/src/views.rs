//! List views that the tools page through and filter.
//!
//! Every change of filter or page goes back to the backend, nothing here is
//! cached between fetches.

use std::fmt;
use std::str::FromStr;

use lsl_proto::v1::{
    ApprovalStatus, Donation, GrantApplication, GrantApplicationList, GrantStatus, Notification,
    Realtor, RealtorList, RealtorStats, Transaction,
};

use crate::session::Session;
use crate::{ClientError, LslClient, NotificationQuery};

/// Number of notifications shown on the dashboard.
const DASHBOARD_NOTIFICATIONS: u32 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RealtorFilter {
    #[default]
    All,
    Approved,
    Pending,
    Denied,
}

impl RealtorFilter {
    pub fn matches(self, realtor: &Realtor) -> bool {
        match self {
            RealtorFilter::All => true,
            RealtorFilter::Approved => realtor.approval() == ApprovalStatus::Approved,
            RealtorFilter::Pending => realtor.approval() == ApprovalStatus::Pending,
            RealtorFilter::Denied => realtor.approval() == ApprovalStatus::Denied,
        }
    }
}

impl FromStr for RealtorFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(RealtorFilter::All),
            "approved" => Ok(RealtorFilter::Approved),
            "pending" => Ok(RealtorFilter::Pending),
            "denied" => Ok(RealtorFilter::Denied),
            _ => Err(format!(
                "invalid filter '{}', expected one of all, approved, pending, denied",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RealtorCounts {
    pub all: usize,
    pub approved: usize,
    pub pending: usize,
    pub denied: usize,
}

impl fmt::Display for RealtorCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "All ({})  Approved ({})  Pending ({})  Denied ({})",
            self.all, self.approved, self.pending, self.denied
        )
    }
}

/// The admin realtor list. One unfiltered page is fetched and the tab filter
/// is applied locally, so the tab counts always describe the same page.
#[derive(Debug, Clone)]
pub struct RealtorListView {
    filter: RealtorFilter,
    page: u32,
    realtors: Vec<Realtor>,
    total: u64,
    pages: u32,
}

impl Default for RealtorListView {
    fn default() -> Self {
        RealtorListView {
            filter: RealtorFilter::All,
            page: 1,
            realtors: Vec::new(),
            total: 0,
            pages: 0,
        }
    }
}

impl RealtorListView {
    pub fn new(filter: RealtorFilter, page: u32) -> Self {
        RealtorListView {
            filter,
            page: page.max(1),
            ..Default::default()
        }
    }

    pub fn filter(&self) -> RealtorFilter {
        self.filter
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn pages(&self) -> u32 {
        self.pages
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub(crate) fn load(&mut self, list: RealtorList) {
        self.total = list.total;
        self.pages = list.pages;
        self.realtors = list.realtors;
    }

    pub async fn refresh(&mut self, client: &LslClient) -> Result<(), ClientError> {
        let list = client.admin_realtor_list(None, self.page).await?;
        self.load(list);
        Ok(())
    }

    pub async fn set_filter(
        &mut self,
        client: &LslClient,
        filter: RealtorFilter,
    ) -> Result<(), ClientError> {
        self.filter = filter;
        self.refresh(client).await
    }

    pub fn visible(&self) -> Vec<&Realtor> {
        self.realtors
            .iter()
            .filter(|r| self.filter.matches(r))
            .collect()
    }

    pub fn counts(&self) -> RealtorCounts {
        self.realtors
            .iter()
            .fold(
                RealtorCounts {
                    all: self.realtors.len(),
                    ..Default::default()
                },
                |mut c, r| {
                    match r.approval() {
                        ApprovalStatus::Approved => c.approved += 1,
                        ApprovalStatus::Pending => c.pending += 1,
                        ApprovalStatus::Denied => c.denied += 1,
                    }
                    c
                },
            )
    }

    pub async fn approve(&mut self, client: &LslClient, id: i64) -> Result<Realtor, ClientError> {
        let r = client.admin_realtor_approve(id).await?;
        self.refresh(client).await?;
        Ok(r)
    }

    pub async fn deny(
        &mut self,
        client: &LslClient,
        id: i64,
        reason: &str,
    ) -> Result<Realtor, ClientError> {
        let r = client.admin_realtor_deny(id, reason).await?;
        self.refresh(client).await?;
        Ok(r)
    }
}

/// Paged grant applications, filtered by status on the backend.
#[derive(Debug, Clone)]
pub struct GrantApplicationListView {
    status: Option<GrantStatus>,
    page: u32,
    applications: Vec<GrantApplication>,
    total: u64,
    pages: u32,
}

impl Default for GrantApplicationListView {
    fn default() -> Self {
        GrantApplicationListView {
            status: None,
            page: 1,
            applications: Vec::new(),
            total: 0,
            pages: 0,
        }
    }
}

impl GrantApplicationListView {
    pub fn new(status: Option<GrantStatus>, page: u32) -> Self {
        GrantApplicationListView {
            status,
            page: page.max(1),
            ..Default::default()
        }
    }

    pub fn status(&self) -> Option<GrantStatus> {
        self.status
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn pages(&self) -> u32 {
        self.pages
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn applications(&self) -> &[GrantApplication] {
        &self.applications
    }

    fn load(&mut self, list: GrantApplicationList) {
        self.total = list.total;
        self.pages = list.pages;
        self.applications = list.applications;
    }

    pub async fn refresh(&mut self, client: &LslClient) -> Result<(), ClientError> {
        let list = client.grant_list(self.status, self.page).await?;
        self.load(list);
        Ok(())
    }

    /// Switch tabs. The page always goes back to the first.
    pub async fn set_status(
        &mut self,
        client: &LslClient,
        status: Option<GrantStatus>,
    ) -> Result<(), ClientError> {
        self.status = status;
        self.page = 1;
        self.refresh(client).await
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Returns false without fetching when already on the last page.
    pub async fn next_page(&mut self, client: &LslClient) -> Result<bool, ClientError> {
        if !self.has_next() {
            return Ok(false);
        }
        self.page += 1;
        self.refresh(client).await?;
        Ok(true)
    }

    /// Returns false without fetching when already on the first page.
    pub async fn prev_page(&mut self, client: &LslClient) -> Result<bool, ClientError> {
        if !self.has_prev() {
            return Ok(false);
        }
        self.page -= 1;
        self.refresh(client).await?;
        Ok(true)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistoryTab {
    #[default]
    Donations,
    Transactions,
}

impl FromStr for HistoryTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "donations" => Ok(HistoryTab::Donations),
            "transactions" => Ok(HistoryTab::Transactions),
            _ => Err(format!(
                "invalid tab '{}', expected donations or transactions",
                s
            )),
        }
    }
}

/// Transactions and donations fetched together. Admins see everyone's.
#[derive(Debug, Clone, Default)]
pub struct History {
    pub tab: HistoryTab,
    pub all_realtors: bool,
    pub transactions: Vec<Transaction>,
    pub donations: Vec<Donation>,
}

impl History {
    pub async fn fetch(session: &Session, tab: HistoryTab) -> Result<Self, ClientError> {
        let user = session.require_user()?;
        let client = session.client();
        let (transactions, donations) = if user.is_admin {
            tokio::try_join!(client.admin_transactions(), client.admin_donations())?
        } else {
            tokio::try_join!(client.transaction_history(), client.donation_history())?
        };
        Ok(History {
            tab,
            all_realtors: user.is_admin,
            transactions,
            donations,
        })
    }

    pub fn total_donated(&self) -> f64 {
        self.donations.iter().map(|d| d.amount).sum()
    }
}

#[derive(Debug, Clone, Default)]
pub struct NotificationsView {
    pub query: NotificationQuery,
    pub notifications: Vec<Notification>,
    pub unread_count: u64,
}

impl NotificationsView {
    pub fn new(query: NotificationQuery) -> Self {
        NotificationsView {
            query,
            ..Default::default()
        }
    }

    pub async fn refresh(&mut self, client: &LslClient) -> Result<(), ClientError> {
        let (notifications, unread_count) = tokio::try_join!(
            client.notification_list(self.query),
            client.notification_unread_count()
        )?;
        self.notifications = notifications;
        self.unread_count = unread_count;
        Ok(())
    }

    pub async fn set_unread_only(
        &mut self,
        client: &LslClient,
        unread_only: bool,
    ) -> Result<(), ClientError> {
        self.query.unread_only = unread_only;
        self.refresh(client).await
    }

    pub async fn mark_read(&mut self, client: &LslClient, id: i64) -> Result<(), ClientError> {
        client.notification_mark_read(id).await?;
        self.refresh(client).await
    }
}

/// What a realtor sees first after logging in.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub stats: RealtorStats,
    pub pending: Vec<Transaction>,
    pub notifications: Vec<Notification>,
}

impl Dashboard {
    pub async fn fetch(client: &LslClient) -> Result<Self, ClientError> {
        let query = NotificationQuery {
            unread_only: false,
            limit: DASHBOARD_NOTIFICATIONS,
        };
        let (stats, pending, notifications) = tokio::try_join!(
            client.realtor_stats(),
            client.donation_pending(),
            client.notification_list(query)
        )?;
        Ok(Dashboard {
            stats,
            pending,
            notifications,
        })
    }

    pub fn amount_owed(&self) -> f64 {
        self.pending
            .iter()
            .map(|t| t.calculated_donation_amount)
            .sum()
    }
}
