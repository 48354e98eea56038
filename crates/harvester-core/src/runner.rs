//! Sequential wallet runner.
//!
//! Wallets run one at a time, in the order the input loader produced them.
//! Each wallet executes behind an error boundary: a failure is logged under
//! the wallet's label and the run moves on to the next wallet, so one dead
//! RPC or empty wallet never strands the rest of the batch.

use crate::{utils, Action, RunError};
use alloy::primitives::{Address, Bytes, U256};
use harvester_account::Signer;
use harvester_bridge::{BridgeApi, ConfirmationPoller, QuoteClient, RelayApi, TxTemplate};
use harvester_config::Config;
use harvester_delivery::{erc20, AlloyChain, ChainInterface, DeliveryError, TransactionExecutor};
use harvester_rewards::{MerklApi, RewardsClaimer};
use harvester_types::{
	display_address, format_eth, format_units, wei_from_eth, Account, GasFees, Network,
	TransactionRequest,
};
use rand::seq::SliceRandom;
use std::sync::Arc;
use std::time::Duration;

/// Drives the selected action across every wallet in the batch.
pub struct Runner {
	config: Arc<Config>,
}

impl Runner {
	/// Creates a runner over a loaded configuration.
	pub fn new(config: Arc<Config>) -> Self {
		Self { config }
	}

	/// Runs the action for every wallet, in order.
	///
	/// Pauses a randomized delay between consecutive wallets, with no
	/// trailing pause after the last one.
	pub async fn run(&self, accounts: &[Account], action: Action) {
		for (position, account) in accounts.iter().enumerate() {
			if let Err(e) = self.execute(account, action).await {
				tracing::error!(label = %account.label, error = %e, "Wallet failed");
			}
			if position + 1 < accounts.len() {
				utils::pause_range(self.config.general.wallet_delay_secs).await;
			}
		}
		tracing::info!(wallets = accounts.len(), "All wallets processed");
	}

	async fn execute(&self, account: &Account, action: Action) -> Result<(), RunError> {
		let signer = Signer::from_key(&account.private_key)?;
		match action {
			Action::Check => self.check(account, &signer).await,
			Action::Claim => self.claim(account, &signer).await,
		}
	}

	/// Reports eligibility for one wallet without transacting.
	async fn check(&self, account: &Account, signer: &Signer) -> Result<(), RunError> {
		let label = self.wallet_label(account, signer.address());
		let claimer = self.rewards_claimer(account)?;
		claimer.fetch_eligibility(signer.address(), &label).await?;
		Ok(())
	}

	/// Claims rewards for one wallet, refueling and forwarding as configured.
	async fn claim(&self, account: &Account, signer: &Signer) -> Result<(), RunError> {
		let address = signer.address();
		let label = self.wallet_label(account, address);
		let network = self.rewards_network()?;
		let chain = self.connect(network)?;
		let executor = TransactionExecutor::new(chain.clone(), signer.clone());
		let rewards = &self.config.rewards;

		// Tokens left over from an earlier interrupted run are forwarded
		// and the wallet is done; claiming again would revert.
		if rewards.forward_to_recipient {
			let held = chain.token_balance(rewards.token, address).await?;
			if held > U256::ZERO {
				tracing::info!(label = %label, "Wallet already holds claimed tokens");
				return self
					.forward(account, address, &chain, &executor, held, &label)
					.await;
			}
		}

		let claimer = self.rewards_claimer(account)?;
		let Some(entry) = claimer.fetch_eligibility(address, &label).await? else {
			return Ok(());
		};
		let calldata = claimer.build_claim(address, &entry).await?;

		let min_balance = wei_from_eth(self.config.refuel.min_balance);
		if chain.native_balance(address).await? < min_balance {
			self.refuel(account, signer, address, network, &label).await?;
			utils::pause_range(self.config.general.action_delay_secs).await;
		}

		let request = chain
			.build_transaction(address, rewards.distributor, U256::ZERO, calldata)
			.await?;
		let outcome = executor.submit(&request, &format!("{} claim", label)).await;
		if !outcome.is_success() {
			return Err(RunError::Transaction(format!(
				"claim did not land: {}",
				outcome.failure_reason().unwrap_or("unknown")
			)));
		}

		if rewards.forward_to_recipient {
			utils::pause_range(self.config.general.action_delay_secs).await;
			let held = chain.token_balance(rewards.token, address).await?;
			self.forward(account, address, &chain, &executor, held, &label)
				.await?;
		}

		Ok(())
	}

	/// Sends the wallet's whole reward token balance to its recipient.
	async fn forward(
		&self,
		account: &Account,
		from: Address,
		chain: &Arc<dyn ChainInterface>,
		executor: &TransactionExecutor,
		amount: U256,
		label: &str,
	) -> Result<(), RunError> {
		let Some(recipient) = account.recipient else {
			tracing::warn!(label, "Forwarding enabled but no recipient for this wallet");
			return Ok(());
		};
		if amount.is_zero() {
			tracing::warn!(label, "No claimed tokens to forward");
			return Ok(());
		}

		let decimals = chain.token_decimals(self.config.rewards.token).await?;
		tracing::info!(
			label,
			amount = %format_units(amount, decimals),
			recipient = %display_address(&recipient, self.config.general.truncate_addresses),
			"Forwarding claimed tokens"
		);
		let input = erc20::transfer_call(recipient, amount);
		let request = chain
			.build_transaction(from, self.config.rewards.token, U256::ZERO, input)
			.await?;
		let outcome = executor.submit(&request, &format!("{} forward", label)).await;
		if !outcome.is_success() {
			return Err(RunError::Transaction(format!(
				"forward did not land: {}",
				outcome.failure_reason().unwrap_or("unknown")
			)));
		}
		Ok(())
	}

	/// Bridges a randomized amount of native gas to the claim chain.
	///
	/// Source chains are tried in shuffled order and the first one whose
	/// balance covers the top of the refuel range wins. The deposit must
	/// land and the bridge must confirm both legs before the claim runs;
	/// a refuel that goes wrong anywhere aborts the wallet.
	async fn refuel(
		&self,
		account: &Account,
		signer: &Signer,
		address: Address,
		destination: &'static Network,
		label: &str,
	) -> Result<(), RunError> {
		let refuel = &self.config.refuel;
		let threshold = wei_from_eth(refuel.amount[1]);

		let mut sources = Vec::with_capacity(refuel.source_chains.len());
		for name in &refuel.source_chains {
			sources.push(self.connect(self.network(name)?)?);
		}
		sources.shuffle(&mut rand::thread_rng());

		let source = first_funded(&sources, address, threshold)
			.await?
			.ok_or(RunError::NoSourceChain)?;
		tracing::info!(label, source = source.network().name, "Selected refuel source");

		let amount = wei_from_eth(utils::pick_amount(refuel.amount));
		let bridge = self.bridge_api(account)?;
		let quote = QuoteClient::new(bridge.clone())
			.refuel_quote(address, source.network(), destination, amount)
			.await?;

		let request = build_deposit(&source, address, &quote.tx).await?;
		let deposit_label = format!(
			"{} refuel {} {} {} -> {}",
			label,
			format_eth(amount),
			source.network().symbol,
			source.network().name,
			destination.name
		);
		let executor = TransactionExecutor::new(source.clone(), signer.clone());
		let outcome = executor.submit(&request, &deposit_label).await;
		if !outcome.is_success() {
			return Err(RunError::Transaction(format!(
				"refuel deposit did not land: {}",
				outcome.failure_reason().unwrap_or("unknown")
			)));
		}

		let poller = ConfirmationPoller::new(
			bridge,
			self.config.bridge.poll_attempts,
			Duration::from_secs(self.config.bridge.poll_interval_secs),
		);
		poller.await_deposit(&quote.request_id).await?;
		match poller.await_receipt(&quote.request_id).await? {
			Some(usd) => tracing::info!(
				label,
				destination = destination.name,
				amount_usd = %usd,
				"Refuel complete"
			),
			None => tracing::info!(label, destination = destination.name, "Refuel complete"),
		}
		Ok(())
	}

	fn wallet_label(&self, account: &Account, address: Address) -> String {
		format!(
			"{} {}",
			account.label,
			display_address(&address, self.config.general.truncate_addresses)
		)
	}

	fn network(&self, name: &str) -> Result<&'static Network, RunError> {
		Network::by_name(name).ok_or_else(|| RunError::Config(format!("unknown network '{}'", name)))
	}

	fn rewards_network(&self) -> Result<&'static Network, RunError> {
		self.network(&self.config.rewards.chain)
	}

	fn connect(&self, network: &'static Network) -> Result<Arc<dyn ChainInterface>, RunError> {
		let endpoint = self.config.networks.get(network.name).ok_or_else(|| {
			RunError::Config(format!("no RPC endpoint configured for '{}'", network.name))
		})?;
		let chain = AlloyChain::connect(
			network,
			&endpoint.rpc_url,
			Duration::from_secs(self.config.delivery.receipt_timeout_secs),
		)?;
		Ok(Arc::new(chain))
	}

	fn proxy<'a>(&self, account: &'a Account) -> Option<&'a str> {
		if self.config.general.use_proxies {
			account.proxy.as_deref()
		} else {
			None
		}
	}

	fn bridge_api(&self, account: &Account) -> Result<Arc<dyn BridgeApi>, RunError> {
		let api = RelayApi::new(&self.config.bridge.api_url, self.proxy(account))?;
		Ok(Arc::new(api))
	}

	fn rewards_claimer(&self, account: &Account) -> Result<RewardsClaimer, RunError> {
		let network = self.rewards_network()?;
		let api = MerklApi::new(
			&self.config.rewards.api_url,
			&self.config.rewards.claim_url,
			self.proxy(account),
		)?;
		Ok(RewardsClaimer::new(Arc::new(api), network.chain_id))
	}
}

/// Picks the first chain whose native balance strictly exceeds `threshold`.
///
/// Chains are queried lazily in the order given, so shuffling the slice
/// first randomizes which funded chain wins.
async fn first_funded(
	chains: &[Arc<dyn ChainInterface>],
	owner: Address,
	threshold: U256,
) -> Result<Option<Arc<dyn ChainInterface>>, DeliveryError> {
	for chain in chains {
		if chain.native_balance(owner).await? > threshold {
			return Ok(Some(chain.clone()));
		}
	}
	Ok(None)
}

/// Assembles the bridge deposit transaction from the quote's template.
///
/// The template's gas limit and fee caps are used when the API provides
/// them; anything missing is filled in from the source chain the same way
/// an ordinary transaction would be.
async fn build_deposit(
	chain: &Arc<dyn ChainInterface>,
	from: Address,
	template: &TxTemplate,
) -> Result<TransactionRequest, RunError> {
	let value = template
		.value
		.parse::<U256>()
		.map_err(|e| RunError::Transaction(format!("quote value is not a decimal string: {}", e)))?;
	let input = template
		.data
		.parse::<Bytes>()
		.map_err(|e| RunError::Transaction(format!("quote calldata is not valid hex: {}", e)))?;

	let network = chain.network();
	let fees = match template_fees(template, network)? {
		Some(fees) => fees,
		None => chain.gas_fees().await?,
	};
	let nonce = chain.nonce(from).await?;

	let mut request = TransactionRequest {
		chain_id: network.chain_id,
		from,
		to: template.to,
		value,
		input,
		nonce,
		gas_limit: 0,
		fees,
	};
	request.gas_limit = match template.gas {
		Some(gas) => gas,
		None => chain.estimate_gas(&request).await?,
	};
	Ok(request)
}

/// Fee caps from the template, when both are present and the chain prices
/// with EIP-1559 fields. `None` means the chain should quote instead.
fn template_fees(template: &TxTemplate, network: &Network) -> Result<Option<GasFees>, RunError> {
	if !network.eip1559 {
		return Ok(None);
	}
	let (Some(max_fee), Some(priority)) = (
		template.max_fee_per_gas.as_deref(),
		template.max_priority_fee_per_gas.as_deref(),
	) else {
		return Ok(None);
	};

	let max_fee_per_gas = max_fee
		.parse::<u128>()
		.map_err(|e| RunError::Transaction(format!("quote fee cap is not a decimal string: {}", e)))?;
	let max_priority_fee_per_gas = priority.parse::<u128>().map_err(|e| {
		RunError::Transaction(format!("quote priority fee is not a decimal string: {}", e))
	})?;
	Ok(Some(GasFees::Eip1559 {
		max_fee_per_gas,
		max_priority_fee_per_gas,
	}))
}
