use crate::block::Block;
use shared::{BlockId, ChainError, Nonce, Result, U256};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Configuração do minerador
#[derive(Debug, Clone)]
pub struct MinerConfig {
    /// Nonces verificados entre leituras da flag de parada
    pub poll_interval: u64,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            poll_interval: 10_000,
        }
    }
}

/// Resultado de uma mineração bem-sucedida
#[derive(Debug, Clone)]
pub struct MiningOutcome {
    pub id: BlockId,
    pub nonce: Nonce,
    pub attempts: u64,
}

/// Minerador com cancelamento cooperativo.
///
/// Camada por cima de [`Block::mine`]: a busca percorre os nonces na mesma
/// ordem, mas consulta uma flag de parada a cada `poll_interval` tentativas,
/// sem alterar o contrato de hash do bloco.
#[derive(Debug)]
pub struct Miner {
    config: MinerConfig,
    stop: AtomicBool,
}

impl Miner {
    /// Cria um novo minerador
    #[must_use]
    pub fn new(config: MinerConfig) -> Self {
        Self {
            config,
            stop: AtomicBool::new(false),
        }
    }

    /// Solicita a interrupção da mineração em curso
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Minera o bloco contra o alvo dado. Retorna `None` se a mineração
    /// foi cancelada; nesse caso o nonce do bloco fica posicionado onde a
    /// busca parou e uma nova chamada continua do mesmo ponto.
    ///
    /// # Errors
    ///
    /// Retorna erro se o alvo for zero ou se a serialização de alguma
    /// transação falhar
    pub fn mine(&self, block: &mut Block, target: U256) -> Result<Option<MiningOutcome>> {
        if target.is_zero() {
            return Err(ChainError::ZeroTarget);
        }
        self.stop.store(false, Ordering::SeqCst);
        block.set_target(target);

        let start_nonce = block.nonce();
        let batch = self.config.poll_interval.max(1);

        loop {
            if self.stop.load(Ordering::SeqCst) {
                debug!(nonce = block.nonce(), "mining cancelled");
                return Ok(None);
            }

            if let Some(id) = block.try_nonces(batch)? {
                let attempts = block.nonce().wrapping_sub(start_nonce).wrapping_add(1);
                debug!(%id, nonce = block.nonce(), attempts, "nonce found");
                return Ok(Some(MiningOutcome {
                    id,
                    nonce: block.nonce(),
                    attempts,
                }));
            }
        }
    }
}
