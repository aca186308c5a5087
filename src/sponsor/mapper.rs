//! Maps profile intents onto Move calls and relays execution.
//!
//! Each build validates its request, assembles a [`TransactionPlan`] with
//! the caller as sender and gas owner, and asks the ledger for unsigned
//! bytes. Nothing is submitted until the caller comes back through
//! [`TransactionMapper::execute_signed_transaction`] with a signature.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::blockchain::{CallArg, LedgerClient, MoveCallTarget, TransactionPlan};
use crate::config::SuiConfig;
use crate::sponsor::types::{
    parse_link_index, parse_social_links, AddLinkRequest, ExecutionRequest, ExecutionResult,
    LedgerStatus, ProfileCreationRequest, ProfileUpdateRequest, RemoveLinkRequest, RequiredFields,
    TransactionBuildResult, UpdateLinkRequest,
};
use crate::sponsor::{SponsorError, SponsorResult};

/// Move entry points of the link-tree package.
pub mod entry {
    pub const CREATE_PROFILE: &str = "create_profile_nft";
    pub const ADD_SOCIAL_LINK: &str = "add_social_link";
    pub const UPDATE_SOCIAL_LINK: &str = "update_social_link";
    pub const REMOVE_SOCIAL_LINK: &str = "remove_social_link";
    pub const UPDATE_PROFILE: &str = "update_profile";
}

/// Immutable settings the mapper is constructed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SponsorSettings {
    pub network: String,
    pub package_id: String,
    pub module_name: String,
    pub gas_budget: u64,
    pub sponsor_address: Option<String>,
}

impl From<&SuiConfig> for SponsorSettings {
    fn from(config: &SuiConfig) -> Self {
        Self {
            network: config.network.clone(),
            package_id: config.package_id.clone(),
            module_name: config.module_name.clone(),
            gas_budget: config.default_gas_budget,
            sponsor_address: config.sponsor_address.clone(),
        }
    }
}

/// Stateless translator from intents to ledger calls.
#[derive(Clone)]
pub struct TransactionMapper {
    settings: SponsorSettings,
    ledger: Arc<dyn LedgerClient>,
}

impl TransactionMapper {
    pub fn new(settings: SponsorSettings, ledger: Arc<dyn LedgerClient>) -> Self {
        Self { settings, ledger }
    }

    pub fn settings(&self) -> &SponsorSettings {
        &self.settings
    }

    /// Mint a new profile. Link titles and urls go out as two parallel
    /// vectors in input order.
    pub async fn build_create_profile(
        &self,
        request: &ProfileCreationRequest,
    ) -> SponsorResult<TransactionBuildResult> {
        let mut fields = RequiredFields::new();
        let user_address = fields.take("userAddress", &request.user_address);
        let name = fields.take("name", &request.name);
        let surname = fields.take("surname", &request.surname);
        fields.require("socialLinks", &request.social_links);
        fields.finish()?;

        let links = match &request.social_links {
            Some(value) => parse_social_links(value)?,
            None => Vec::new(),
        };
        let (titles, urls): (Vec<String>, Vec<String>) =
            links.into_iter().map(|link| (link.title, link.url)).unzip();

        let description = request.description.clone().unwrap_or_default();

        self.build(
            user_address,
            entry::CREATE_PROFILE,
            vec![
                CallArg::string(name),
                CallArg::string(surname),
                CallArg::string(description),
                CallArg::strings(titles),
                CallArg::strings(urls),
            ],
        )
        .await
    }

    pub async fn build_add_social_link(
        &self,
        request: &AddLinkRequest,
    ) -> SponsorResult<TransactionBuildResult> {
        let mut fields = RequiredFields::new();
        let user_address = fields.take("userAddress", &request.user_address);
        let nft_id = fields.take("nftId", &request.nft_id);
        let title = fields.take("title", &request.title);
        let url = fields.take("url", &request.url);
        fields.finish()?;

        self.build(
            user_address,
            entry::ADD_SOCIAL_LINK,
            vec![CallArg::object(nft_id), CallArg::string(title), CallArg::string(url)],
        )
        .await
    }

    /// The index is not checked against the link list; an out-of-range
    /// position aborts on-chain at execution time.
    pub async fn build_update_social_link(
        &self,
        request: &UpdateLinkRequest,
    ) -> SponsorResult<TransactionBuildResult> {
        let mut fields = RequiredFields::new();
        let user_address = fields.take("userAddress", &request.user_address);
        let nft_id = fields.take("nftId", &request.nft_id);
        fields.require("linkIndex", &request.link_index);
        let new_title = fields.take("newTitle", &request.new_title);
        let new_url = fields.take("newUrl", &request.new_url);
        fields.finish()?;

        let link_index = parse_required_index(&request.link_index)?;

        self.build(
            user_address,
            entry::UPDATE_SOCIAL_LINK,
            vec![
                CallArg::object(nft_id),
                CallArg::u64(link_index),
                CallArg::string(new_title),
                CallArg::string(new_url),
            ],
        )
        .await
    }

    pub async fn build_remove_social_link(
        &self,
        request: &RemoveLinkRequest,
    ) -> SponsorResult<TransactionBuildResult> {
        let mut fields = RequiredFields::new();
        let user_address = fields.take("userAddress", &request.user_address);
        let nft_id = fields.take("nftId", &request.nft_id);
        fields.require("linkIndex", &request.link_index);
        fields.finish()?;

        let link_index = parse_required_index(&request.link_index)?;

        self.build(
            user_address,
            entry::REMOVE_SOCIAL_LINK,
            vec![CallArg::object(nft_id), CallArg::u64(link_index)],
        )
        .await
    }

    /// Full overwrite: an omitted description is sent as "".
    pub async fn build_update_profile(
        &self,
        request: &ProfileUpdateRequest,
    ) -> SponsorResult<TransactionBuildResult> {
        let mut fields = RequiredFields::new();
        let user_address = fields.take("userAddress", &request.user_address);
        let nft_id = fields.take("nftId", &request.nft_id);
        let name = fields.take("name", &request.name);
        let surname = fields.take("surname", &request.surname);
        fields.finish()?;

        let description = request.description.clone().unwrap_or_default();

        self.build(
            user_address,
            entry::UPDATE_PROFILE,
            vec![
                CallArg::object(nft_id),
                CallArg::string(name),
                CallArg::string(surname),
                CallArg::string(description),
            ],
        )
        .await
    }

    /// Forward a signed payload. The signature is opaque here; the node
    /// decides whether it is valid.
    pub async fn execute_signed_transaction(
        &self,
        request: &ExecutionRequest,
    ) -> SponsorResult<ExecutionResult> {
        let mut fields = RequiredFields::new();
        let transaction_bytes = fields.take("transactionBytes", &request.transaction_bytes);
        let signature = fields.take("userSignature", &request.user_signature);
        fields.finish()?;

        if STANDARD.decode(transaction_bytes.as_bytes()).is_err() {
            return Err(SponsorError::Validation(
                "transactionBytes must be base64-encoded".into(),
            ));
        }

        let outcome = self
            .ledger
            .execute_transaction(&transaction_bytes, &[signature])
            .await?;

        tracing::info!(digest = %outcome.digest, "Transaction executed");
        Ok(outcome.into())
    }

    /// Node checkpoint plus the sponsor address balance when one is configured.
    pub async fn ledger_status(&self) -> SponsorResult<LedgerStatus> {
        let checkpoint = self.ledger.latest_checkpoint().await?;

        let balance = match &self.settings.sponsor_address {
            Some(address) => Some(self.ledger.get_balance(address).await?),
            None => None,
        };

        Ok(LedgerStatus {
            network: self.settings.network.clone(),
            checkpoint,
            address: self.settings.sponsor_address.clone(),
            balance,
        })
    }

    fn target(&self, function: &str) -> MoveCallTarget {
        MoveCallTarget {
            package: self.settings.package_id.clone(),
            module: self.settings.module_name.clone(),
            function: function.to_string(),
        }
    }

    async fn build(
        &self,
        sender: String,
        function: &str,
        arguments: Vec<CallArg>,
    ) -> SponsorResult<TransactionBuildResult> {
        let plan = TransactionPlan {
            sender,
            gas_budget: self.settings.gas_budget,
            target: self.target(function),
            arguments,
        };

        let bytes = self.ledger.build_move_call(&plan).await?;

        tracing::info!(
            function,
            sender = %plan.sender,
            size = bytes.len(),
            "Transaction payload built"
        );

        Ok(TransactionBuildResult {
            success: true,
            transaction_bytes: STANDARD.encode(bytes),
        })
    }
}

fn parse_required_index(value: &Option<serde_json::Value>) -> SponsorResult<u64> {
    match value {
        Some(value) => parse_link_index(value),
        None => Err(SponsorError::Validation("missing required field: linkIndex".into())),
    }
}
