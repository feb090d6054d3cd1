//! NFT mint, burn and modify

use crate::actions::{invalid, is_set, parse_field, required, value, ActionError};
use crate::core::transaction::{NfTokenBurn, NfTokenMint, NfTokenModify};
use crate::core::{Amount, Drops, NfTokenMintFlags, Transaction, TransactionBuilder};
use crate::validation::Form;

fn uri_hex(form: &Form) -> Option<String> {
    value(form, "uri").map(hex::encode_upper)
}

fn owner(form: &Form) -> Option<String> {
    value(form, "owner").map(str::to_string)
}

pub fn nft_mint(account: &str, form: &Form) -> Result<Transaction, ActionError> {
    let mut flags = NfTokenMintFlags::empty();
    flags.set(NfTokenMintFlags::BURNABLE, is_set(form, "burnable"));
    flags.set(NfTokenMintFlags::ONLY_XRP, is_set(form, "only_xrp"));
    flags.set(NfTokenMintFlags::TRANSFERABLE, is_set(form, "transferable"));
    flags.set(NfTokenMintFlags::MUTABLE, is_set(form, "mutable"));

    let transfer_fee: Option<u16> = parse_field(form, "transfer_fee")?;
    if transfer_fee.unwrap_or(0) > 0 && !flags.contains(NfTokenMintFlags::TRANSFERABLE) {
        return Err(invalid("transfer_fee", "requires the token to be transferable"));
    }

    let amount = value(form, "amount")
        .map(Drops::from_xrp)
        .transpose()?
        .map(Amount::Native);
    let destination = value(form, "destination").map(str::to_string);
    if destination.is_some() && amount.is_none() {
        return Err(invalid("destination", "needs an amount for the sell offer"));
    }

    Ok(TransactionBuilder::new(account)
        .flags(flags.bits())
        .build(NfTokenMint {
            nftoken_taxon: required(form, "taxon")?
                .parse()
                .map_err(|_| invalid("taxon", "could not be parsed"))?,
            issuer: value(form, "issuer").map(str::to_string),
            transfer_fee,
            uri: uri_hex(form),
            amount,
            destination,
            expiration: parse_field(form, "expiration")?,
        }))
}

pub fn nft_burn(account: &str, form: &Form) -> Result<Transaction, ActionError> {
    Ok(TransactionBuilder::new(account).build(NfTokenBurn {
        nftoken_id: required(form, "nftoken_id")?.to_uppercase(),
        owner: owner(form),
    }))
}

/// Replace (or clear, when `uri` is blank) a mutable token's URI
pub fn nft_modify(account: &str, form: &Form) -> Result<Transaction, ActionError> {
    Ok(TransactionBuilder::new(account).build(NfTokenModify {
        nftoken_id: required(form, "nftoken_id")?.to_uppercase(),
        owner: owner(form),
        uri: uri_hex(form),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::form;
    use crate::core::TransactionKind;

    #[test]
    fn test_mint_flags_and_uri() {
        let tx = nft_mint(
            "rArtist",
            &form(&[
                ("taxon", "7"),
                ("uri", "ipfs://cid"),
                ("transferable", "true"),
                ("burnable", "false"),
                ("transfer_fee", "2500"),
            ]),
        )
        .unwrap();

        assert_eq!(tx.flags(), NfTokenMintFlags::TRANSFERABLE.bits());
        let TransactionKind::NfTokenMint(mint) = &tx.kind else {
            panic!("not a mint");
        };
        assert_eq!(mint.nftoken_taxon, 7);
        assert_eq!(mint.transfer_fee, Some(2500));
        assert_eq!(mint.uri.as_deref(), Some(hex::encode_upper("ipfs://cid").as_str()));
        assert!(tx.increases_owner_count());
    }

    #[test]
    fn test_fee_needs_transferable() {
        let result = nft_mint("rArtist", &form(&[("taxon", "0"), ("transfer_fee", "10")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_mint_with_sell_offer() {
        let tx = nft_mint(
            "rArtist",
            &form(&[("taxon", "1"), ("amount", "2"), ("destination", "rBuyer")]),
        )
        .unwrap();
        assert_eq!(tx.native_amount(), Some(Drops(2_000_000)));

        assert!(nft_mint("rArtist", &form(&[("taxon", "1"), ("destination", "rBuyer")])).is_err());
    }

    #[test]
    fn test_burn_and_modify() {
        let id = "000800006203f49c21d5d6e022cb16de3538f248662fc73c0000000100000000";
        let burn = nft_burn("rHolder", &form(&[("nftoken_id", id)])).unwrap();
        let TransactionKind::NfTokenBurn(burn) = burn.kind else {
            panic!("not a burn");
        };
        assert_eq!(burn.nftoken_id, id.to_uppercase());
        assert!(burn.owner.is_none());

        let modify = nft_modify(
            "rIssuer",
            &form(&[("nftoken_id", id), ("owner", "rHolder")]),
        )
        .unwrap();
        let TransactionKind::NfTokenModify(modify) = modify.kind else {
            panic!("not a modify");
        };
        assert_eq!(modify.owner.as_deref(), Some("rHolder"));
        assert!(modify.uri.is_none());
    }
}
