//! Testes de integração do motor: forks, snapshots por bloco e escolha de
//! ponta por trabalho acumulado.

use lodestone_core::{
    Block, Blockchain, ChainError, ChainParams, Input, Miner, MinerConfig, OutPoint, Output,
    Predicate, Transaction, U256, Value,
};

fn params() -> ChainParams {
    ChainParams {
        genesis_target: U256::one() << 252,
        max_mint: 5000,
    }
}

fn mined_block(prior: lodestone_core::BlockId, txs: Vec<Transaction>, target: U256) -> Block {
    let mut block = Block::new();
    block.set_prior(Some(prior));
    block.set_transactions(txs);
    block.mine(target).unwrap();
    block
}

#[test]
fn chain_of_spends_across_blocks() {
    let mut chain = Blockchain::new(params()).unwrap();
    let target = chain.params().genesis_target;
    let genesis_id = chain.genesis().block.id().unwrap();

    // Bloco 1: coinbase protegida por predicado
    let coinbase = Transaction::coinbase(
        vec![Output::new(
            Some(Predicate::EqualsConstant(Value::Bytes(vec![0xAA]))),
            5000,
        )],
        vec![],
    );
    let coinbase_id = coinbase.id().unwrap();
    let block1 = mined_block(genesis_id, vec![coinbase], target);
    let block1_id = block1.id().unwrap();
    chain.extend(block1).unwrap();

    // Bloco 2: gasta a coinbase do bloco 1 apresentando o satisfier certo
    let mint = Transaction::coinbase(vec![Output::open(100)], vec![2]);
    let spend = Transaction::new(
        vec![Input::new(
            OutPoint::new(coinbase_id, 0),
            vec![Value::Bytes(vec![0xAA])],
        )],
        vec![Output::open(3000), Output::open(2000)],
        vec![],
    );
    let spend_id = spend.id().unwrap();
    let block2 = mined_block(block1_id, vec![mint, spend], target);
    let block2_id = block2.id().unwrap();
    chain.extend(block2).unwrap();

    let entry2 = chain.entry(&block2_id).unwrap();
    assert_eq!(entry2.height, 2);
    // A saída gasta sumiu; as novas saídas existem
    assert!(!entry2.utxo.contains(&OutPoint::new(coinbase_id, 0)));
    assert!(entry2.utxo.contains(&OutPoint::new(spend_id, 0)));
    assert!(entry2.utxo.contains(&OutPoint::new(spend_id, 1)));
    assert_eq!(entry2.utxo.total_amount(), Some(5100));

    // O snapshot do bloco 1 não foi tocado pela extensão
    let entry1 = chain.entry(&block1_id).unwrap();
    assert!(entry1.utxo.contains(&OutPoint::new(coinbase_id, 0)));
}

#[test]
fn wrong_satisfier_is_rejected_at_block_level() {
    let mut chain = Blockchain::new(params()).unwrap();
    let target = chain.params().genesis_target;
    let genesis_id = chain.genesis().block.id().unwrap();

    let coinbase = Transaction::coinbase(
        vec![Output::new(
            Some(Predicate::EqualsConstant(Value::Bytes(vec![0xAA]))),
            5000,
        )],
        vec![],
    );
    let coinbase_id = coinbase.id().unwrap();
    let block1 = mined_block(genesis_id, vec![coinbase], target);
    let block1_id = block1.id().unwrap();
    chain.extend(block1).unwrap();

    let mint = Transaction::coinbase(vec![], vec![]);
    let bad_spend = Transaction::new(
        vec![Input::new(
            OutPoint::new(coinbase_id, 0),
            vec![Value::Bytes(vec![0xBB])],
        )],
        vec![Output::open(5000)],
        vec![],
    );
    let block2 = mined_block(block1_id, vec![mint, bad_spend], target);
    let block2_id = block2.id().unwrap();

    assert!(matches!(
        chain.extend(block2).unwrap_err(),
        ChainError::InvalidTransaction(_)
    ));
    assert!(!chain.contains(&block2_id));
}

#[test]
fn forks_validate_against_their_own_branch() {
    let mut chain = Blockchain::new(params()).unwrap();
    let target = chain.params().genesis_target;
    let genesis_id = chain.genesis().block.id().unwrap();

    let funding = Transaction::coinbase(vec![Output::open(5000)], vec![]);
    let funding_id = funding.id().unwrap();
    let block1 = mined_block(genesis_id, vec![funding], target);
    let block1_id = block1.id().unwrap();
    chain.extend(block1).unwrap();

    // As duas bifurcações gastam a MESMA saída, cada uma no seu ramo
    let spend_a = Transaction::new(
        vec![Input::new(OutPoint::new(funding_id, 0), vec![])],
        vec![Output::open(5000)],
        vec![0xA],
    );
    let spend_b = Transaction::new(
        vec![Input::new(OutPoint::new(funding_id, 0), vec![])],
        vec![Output::open(4000)],
        vec![0xB],
    );

    let fork_a = mined_block(
        block1_id,
        vec![Transaction::coinbase(vec![], vec![0xA]), spend_a],
        target,
    );
    let fork_b = mined_block(
        block1_id,
        vec![Transaction::coinbase(vec![], vec![0xB]), spend_b],
        target >> 1,
    );
    let fork_a_id = fork_a.id().unwrap();
    let fork_b_id = fork_b.id().unwrap();

    chain.extend(fork_a).unwrap();
    chain.extend(fork_b).unwrap();

    assert_eq!(chain.blocks_at_height(2).len(), 2);

    // Cada ramo consumiu a saída no seu próprio snapshot
    for id in [&fork_a_id, &fork_b_id] {
        assert!(!chain.entry(id).unwrap().utxo.contains(&OutPoint::new(funding_id, 0)));
    }

    // O ramo B tem mais trabalho (alvo menor)
    assert_eq!(chain.cumulative_work(&fork_a_id), Some(3.0));
    assert_eq!(chain.cumulative_work(&fork_b_id), Some(4.0));
    assert_eq!(chain.tip().block.id().unwrap(), fork_b_id);

    // Estender o ramo A com um bloco pesado faz a ponta "pular" de volta,
    // sem qualquer replay: o snapshot do ramo está pronto
    let heavy = mined_block(fork_a_id, vec![], target >> 2);
    let heavy_id = heavy.id().unwrap();
    chain.extend(heavy).unwrap();

    assert_eq!(chain.cumulative_work(&heavy_id), Some(7.0));
    assert_eq!(chain.tip().block.id().unwrap(), heavy_id);
    assert_eq!(chain.stats().best_height, 3);
}

#[test]
fn parent_walk_reaches_genesis_in_height_steps() {
    let mut chain = Blockchain::new(params()).unwrap();
    let target = chain.params().genesis_target;
    let mut prior = chain.genesis().block.id().unwrap();

    for round in 0..4 {
        let block = mined_block(
            prior,
            vec![Transaction::coinbase(vec![Output::open(1)], vec![round])],
            target,
        );
        prior = block.id().unwrap();
        chain.extend(block).unwrap();
    }

    // Caminhar pelos antecessores a partir da ponta chega ao gênese em
    // exatamente `height` passos
    let tip = chain.tip();
    let mut steps = 0;
    let mut cursor = tip.block.clone();
    while let Some(parent_id) = cursor.prior() {
        cursor = chain.block(&parent_id).unwrap().clone();
        steps += 1;
    }
    assert_eq!(steps, tip.height);
    assert!(cursor.prior().is_none());
}

#[test]
fn stored_snapshots_match_revalidation() {
    let mut chain = Blockchain::new(params()).unwrap();
    let target = chain.params().genesis_target;
    let genesis_id = chain.genesis().block.id().unwrap();

    let funding = Transaction::coinbase(vec![Output::open(2500), Output::open(2500)], vec![]);
    let funding_id = funding.id().unwrap();
    let block1 = mined_block(genesis_id, vec![funding], target);
    let block1_id = block1.id().unwrap();
    chain.extend(block1).unwrap();

    let spend = Transaction::new(
        vec![Input::new(OutPoint::new(funding_id, 1), vec![])],
        vec![Output::open(2000)],
        vec![],
    );
    let block2 = mined_block(
        block1_id,
        vec![Transaction::coinbase(vec![Output::open(10)], vec![]), spend],
        target,
    );
    let block2_id = block2.id().unwrap();
    chain.extend(block2).unwrap();

    // Reaplicar as transações de cada bloco ao snapshot do pai reproduz
    // exatamente o snapshot armazenado
    let max_mint = chain.params().max_mint;
    for id in [&block1_id, &block2_id] {
        let entry = chain.entry(id).unwrap();
        let parent_id = entry.block.prior().unwrap();
        let parent_utxo = &chain.entry(&parent_id).unwrap().utxo;
        let replayed = entry.block.validate(parent_utxo, max_mint).unwrap();
        assert_eq!(replayed, entry.utxo);
    }
}

#[test]
fn work_accumulates_parent_plus_own() {
    let mut chain = Blockchain::new(params()).unwrap();
    let target = chain.params().genesis_target;
    let genesis_id = chain.genesis().block.id().unwrap();

    let mut prior = genesis_id;
    for shift in [0u32, 1, 3] {
        let block = mined_block(prior, vec![], target >> shift);
        let id = block.id().unwrap();
        let block_target = block.target();
        chain.extend(block).unwrap();

        let parent_work = chain.cumulative_work(&prior).unwrap();
        let own_work = chain.work(block_target);
        assert_eq!(chain.cumulative_work(&id), Some(parent_work + own_work));
        prior = id;
    }
}

#[test]
fn tip_work_dominates_every_known_block() {
    let mut chain = Blockchain::new(params()).unwrap();
    let target = chain.params().genesis_target;
    let genesis_id = chain.genesis().block.id().unwrap();

    let mut ids = vec![genesis_id];
    for shift in [0u32, 1, 2] {
        let block = mined_block(genesis_id, vec![], target >> shift);
        ids.push(block.id().unwrap());
        chain.extend(block).unwrap();
    }

    let tip_id = chain.tip().block.id().unwrap();
    let tip_work = chain.cumulative_work(&tip_id).unwrap();
    for id in &ids {
        assert!(tip_work >= chain.cumulative_work(id).unwrap());
    }
}

#[test]
fn rejected_orphan_can_be_resubmitted_after_parent_arrives() {
    let mut chain = Blockchain::new(params()).unwrap();
    let target = chain.params().genesis_target;
    let genesis_id = chain.genesis().block.id().unwrap();

    let parent = mined_block(genesis_id, vec![], target);
    let parent_id = parent.id().unwrap();
    let child = mined_block(parent_id, vec![], target);

    // O reenvio após a chegada do pai é responsabilidade do chamador
    assert_eq!(
        chain.extend(child.clone()).unwrap_err(),
        ChainError::UnknownPriorBlock
    );
    chain.extend(parent).unwrap();
    chain.extend(child).unwrap();
    assert_eq!(chain.stats().best_height, 2);
}

#[test]
fn miner_output_extends_the_chain() {
    let mut chain = Blockchain::new(params()).unwrap();
    let target = chain.params().genesis_target;
    let genesis_id = chain.genesis().block.id().unwrap();

    let miner = Miner::new(MinerConfig { poll_interval: 64 });
    let mut block = Block::new();
    block.set_prior(Some(genesis_id));
    block.set_transactions(vec![Transaction::coinbase(vec![Output::open(5000)], vec![])]);

    let outcome = miner.mine(&mut block, target).unwrap().unwrap();
    assert_eq!(outcome.id, block.id().unwrap());

    chain.extend(block).unwrap();
    assert!(chain.contains(&outcome.id));
    assert_eq!(chain.tip().block.id().unwrap(), outcome.id);
}
