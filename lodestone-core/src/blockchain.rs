use crate::block::Block;
use crate::utxo::UtxoSet;
use serde::{Deserialize, Serialize};
use shared::{Amount, BlockHeight, BlockId, ChainError, Result, U256};
use std::collections::HashMap;
use tracing::{debug, info};

/// 2^64 como ponto flutuante, para converter limbs de um `U256`
const LIMB: f64 = 18_446_744_073_709_551_616.0;

/// Parâmetros de consenso do motor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainParams {
    /// Alvo de dificuldade do bloco gênese
    pub genesis_target: U256,
    /// Máximo de moedas que uma coinbase pode criar por bloco
    pub max_mint: Amount,
}

impl Default for ChainParams {
    fn default() -> Self {
        Self {
            genesis_target: U256::one() << 252,
            max_mint: 5000,
        }
    }
}

/// Estado derivado de um bloco aceito na árvore
#[derive(Debug, Clone)]
pub struct ChainEntry {
    /// O bloco aceito
    pub block: Block,
    /// Altura na árvore; o gênese tem altura zero
    pub height: BlockHeight,
    /// Snapshot UTXO após aplicar as transações do bloco
    pub utxo: UtxoSet,
}

/// Árvore de blocos aceitos com escolha de ponta por trabalho acumulado.
///
/// Cada bloco aceito retém o seu snapshot UTXO pós-validação, de modo que
/// qualquer bifurcação pode ser estendida sem reprocessar a cadeia; o custo
/// é memória proporcional ao número de blocos vezes o tamanho médio do
/// conjunto UTXO.
#[derive(Debug)]
pub struct Blockchain {
    /// Blocos aceitos, indexados por identificador
    entries: HashMap<BlockId, ChainEntry>,
    /// Identificadores conhecidos em cada altura (todas as bifurcações)
    by_height: HashMap<BlockHeight, Vec<BlockId>>,
    /// Ordem de aceitação, para desempate determinístico da ponta
    accept_order: Vec<BlockId>,
    params: ChainParams,
}

impl Blockchain {
    /// Cria a cadeia minerando o bloco gênese com o alvo configurado.
    /// O gênese não tem antecessor, não tem transações e recebe o snapshot
    /// UTXO vazio.
    ///
    /// # Errors
    ///
    /// Retorna erro se o alvo do gênese for zero
    pub fn new(params: ChainParams) -> Result<Self> {
        let mut genesis = Block::new();
        genesis.mine(params.genesis_target)?;
        let genesis_id = genesis.id()?;

        let mut chain = Self {
            entries: HashMap::new(),
            by_height: HashMap::new(),
            accept_order: Vec::new(),
            params,
        };
        chain.store(
            genesis_id,
            ChainEntry {
                block: genesis,
                height: 0,
                utxo: UtxoSet::new(),
            },
        );
        info!(genesis = %genesis_id, "chain initialized");
        Ok(chain)
    }

    fn store(&mut self, id: BlockId, entry: ChainEntry) {
        self.by_height.entry(entry.height).or_default().push(id);
        self.entries.insert(id, entry);
        self.accept_order.push(id);
    }

    /// Anexa um bloco à árvore, na posição indicada pelo seu antecessor,
    /// que pode não ser a ponta atual. O snapshot do pai serve de base para
    /// a validação e permanece intacto; reenvio de um bloco já aceito é
    /// idempotente.
    ///
    /// # Errors
    ///
    /// Retorna erro se o antecessor for desconhecido (o bloco órfão não é
    /// armazenado) ou se a validação do bloco falhar
    pub fn extend(&mut self, block: Block) -> Result<()> {
        let id = block.id()?;
        if self.entries.contains_key(&id) {
            return Ok(());
        }

        // Somente o gênese não tem antecessor
        let prior = block.prior().ok_or(ChainError::UnknownPriorBlock)?;
        let parent = match self.entries.get(&prior) {
            Some(parent) => parent,
            None => {
                debug!(block = %id, %prior, "orphan block rejected");
                return Err(ChainError::UnknownPriorBlock);
            }
        };

        let utxo = block.validate(&parent.utxo, self.params.max_mint)?;
        let height = parent.height + 1;
        debug!(block = %id, height, "block accepted");
        self.store(id, ChainEntry { block, height, utxo });
        Ok(())
    }

    /// Trabalho exigido por um alvo: a razão entre o alvo do gênese e o
    /// alvo dado. Alvos menores representam mais trabalho.
    #[must_use]
    pub fn work(&self, target: U256) -> f64 {
        u256_to_f64(self.params.genesis_target) / u256_to_f64(target)
    }

    /// Trabalho acumulado do bloco até o gênese, somando o trabalho de cada
    /// alvo ao longo dos links de antecessor. `None` se o bloco é
    /// desconhecido.
    #[must_use]
    pub fn cumulative_work(&self, id: &BlockId) -> Option<f64> {
        let mut entry = self.entries.get(id)?;
        let mut total = 0.0;
        loop {
            total += self.work(entry.block.target());
            match entry.block.prior() {
                Some(prior) => entry = self.entries.get(&prior)?,
                None => return Some(total),
            }
        }
    }

    /// Todos os blocos conhecidos na altura dada, incluindo bifurcações;
    /// vazio para alturas desconhecidas
    #[must_use]
    pub fn blocks_at_height(&self, height: BlockHeight) -> Vec<&Block> {
        match self.by_height.get(&height) {
            Some(ids) => ids
                .iter()
                .filter_map(|id| self.entries.get(id))
                .map(|entry| &entry.block)
                .collect(),
            None => Vec::new(),
        }
    }

    /// A ponta da árvore: o bloco com maior trabalho acumulado. Empates
    /// são resolvidos a favor do bloco aceito primeiro.
    ///
    /// # Panics
    ///
    /// Nunca deve entrar em pânico pois o bloco gênese sempre existe
    #[must_use]
    pub fn tip(&self) -> &ChainEntry {
        self.tip_with_work().0
    }

    fn tip_with_work(&self) -> (&ChainEntry, f64) {
        let mut best: Option<(&ChainEntry, f64)> = None;

        for id in &self.accept_order {
            let entry = &self.entries[id];
            let work = match self.cumulative_work(id) {
                Some(work) => work,
                None => continue,
            };
            match best {
                Some((_, best_work)) if work <= best_work => {}
                _ => best = Some((entry, work)),
            }
        }

        best.expect("genesis always exists")
    }

    /// Obtém a entrada de um bloco aceito
    #[must_use]
    pub fn entry(&self, id: &BlockId) -> Option<&ChainEntry> {
        self.entries.get(id)
    }

    /// Obtém um bloco aceito pelo identificador
    #[must_use]
    pub fn block(&self, id: &BlockId) -> Option<&Block> {
        self.entries.get(id).map(|entry| &entry.block)
    }

    /// Verifica se um bloco já foi aceito
    #[must_use]
    pub fn contains(&self, id: &BlockId) -> bool {
        self.entries.contains_key(id)
    }

    /// A entrada do bloco gênese
    ///
    /// # Panics
    ///
    /// Nunca deve entrar em pânico pois o bloco gênese sempre existe
    #[must_use]
    pub fn genesis(&self) -> &ChainEntry {
        &self.entries[&self.accept_order[0]]
    }

    /// Parâmetros de consenso da cadeia
    #[must_use]
    pub const fn params(&self) -> &ChainParams {
        &self.params
    }

    /// Estatísticas da árvore de blocos
    #[must_use]
    pub fn stats(&self) -> ChainStats {
        let (tip, tip_work) = self.tip_with_work();

        ChainStats {
            total_blocks: self.entries.len() as u64,
            best_height: tip.height,
            tip_work,
        }
    }
}

/// Estatísticas da árvore de blocos
#[derive(Debug, Clone)]
pub struct ChainStats {
    pub total_blocks: u64,
    pub best_height: BlockHeight,
    pub tip_work: f64,
}

/// Converte um `U256` para ponto flutuante, limb a limb
fn u256_to_f64(value: U256) -> f64 {
    value
        .0
        .iter()
        .rev()
        .fold(0.0, |acc, &limb| acc * LIMB + limb as f64)
}
