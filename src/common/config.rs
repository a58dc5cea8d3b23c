use configparser::ini::Ini;
use anyhow::{anyhow, bail, Result};
use crate::get_ini;

#[derive(Clone, Debug, PartialEq)]
pub struct BlockTags {
	pub physical: String,
	pub futures: String,
	pub option: String
}

#[derive(Clone, Debug, PartialEq)]
pub struct RootTags {
	pub pf_id: String,
	pub pf_code: String,
	pub currency: String,
	pub cvf: String,
	pub svf: String,
	pub value_meth: String,
	pub price_meth: String,
	pub setl_meth: String
}

#[derive(Clone, Debug, PartialEq)]
pub struct ContractTags {
	pub physical: String,
	pub futures: String,
	pub contract_id: String,
	pub expiry: String,
	pub volatility: String,
	pub settle_date: String,
	pub price_scan: String,
	pub vol_scan: String
}

// Futures carry <intrRate><val>..</val></intrRate>, option series read <val> directly
#[derive(Clone, Debug, PartialEq)]
pub struct InterestTags {
	pub rate: String,
	pub value: String
}

#[derive(Clone, Debug, PartialEq)]
pub struct OptionTags {
	pub series: String,
	pub option: String,
	pub contract_id: String,
	pub option_type: String,
	pub strike_price: String,
	pub option_value: String
}

#[derive(Clone, Debug, PartialEq)]
pub struct RiskArrayTags {
	pub array: String,
	pub r: String,
	pub a: String,
	pub d: String
}

/*
Tag vocabulary of a particular feed variant.
Every tag name the parser looks up is resolved through this structure, which is validated in full when it is loaded.
*/
#[derive(Clone, Debug, PartialEq)]
pub struct TagConfig {
	pub blocks: BlockTags,
	pub root: RootTags,
	pub contract: ContractTags,
	pub interest: InterestTags,
	pub option: OptionTags,
	pub risk_array: RiskArrayTags
}

impl TagConfig {
	pub fn load(path: &str) -> Result<TagConfig> {
		let ini = get_ini(path)?;
		TagConfig::from_ini(&ini)
	}

	pub fn from_ini(ini: &Ini) -> Result<TagConfig> {
		let get_tag = |section: &str, key: &str| -> Result<String> {
			let Some(value) = ini.get(section, key) else {
				bail!("Missing value \"{key}\" in section \"{section}\" of tag configuration");
			};
			let tag = value.trim();
			if tag.is_empty() {
				bail!("Empty value \"{key}\" in section \"{section}\" of tag configuration");
			}
			if tag.contains(|c: char| c == '<' || c == '>' || c == '/') {
				return Err(anyhow!("Invalid tag name \"{tag}\" for key \"{key}\" in section \"{section}\""));
			}
			Ok(tag.to_string())
		};
		let blocks_section = "blocks";
		let blocks = BlockTags {
			physical: get_tag(blocks_section, "PHYPF_BLOCK_TAG")?,
			futures: get_tag(blocks_section, "FUTPF_BLOCK_TAG")?,
			option: get_tag(blocks_section, "OOPF_BLOCK_TAG")?
		};
		let root_section = "root";
		let root = RootTags {
			pf_id: get_tag(root_section, "PF_ID_TAG")?,
			pf_code: get_tag(root_section, "PF_CODE_TAG")?,
			currency: get_tag(root_section, "CURRENCY_TAG")?,
			cvf: get_tag(root_section, "CVF_TAG")?,
			svf: get_tag(root_section, "SVF_TAG")?,
			value_meth: get_tag(root_section, "VALUE_METH_TAG")?,
			price_meth: get_tag(root_section, "PRICE_METH_TAG")?,
			setl_meth: get_tag(root_section, "SETL_METH_TAG")?
		};
		let contract_section = "contract";
		let contract = ContractTags {
			physical: get_tag(contract_section, "PHY_TAG")?,
			futures: get_tag(contract_section, "FUT_TAG")?,
			contract_id: get_tag(contract_section, "CONTRACT_ID_TAG")?,
			expiry: get_tag(contract_section, "EXPIRY_TAG")?,
			volatility: get_tag(contract_section, "VOLATILITY_TAG")?,
			settle_date: get_tag(contract_section, "SETTLE_DATE_TAG")?,
			price_scan: get_tag(contract_section, "PRICE_SCAN_TAG")?,
			vol_scan: get_tag(contract_section, "VOL_SCAN_TAG")?
		};
		let interest_section = "interest";
		let interest = InterestTags {
			rate: get_tag(interest_section, "INTR_RATE_TAG")?,
			value: get_tag(interest_section, "VALUE_TAG")?
		};
		let option_section = "option";
		let option = OptionTags {
			series: get_tag(option_section, "SERIES_TAG")?,
			option: get_tag(option_section, "OPT_TAG")?,
			contract_id: get_tag(option_section, "OPT_CONTRACT_ID_TAG")?,
			option_type: get_tag(option_section, "OPTION_TYPE_TAG")?,
			strike_price: get_tag(option_section, "STRIKE_PRICE_TAG")?,
			option_value: get_tag(option_section, "OPTION_VALUE_TAG")?
		};
		let risk_array_section = "riskarray";
		let risk_array = RiskArrayTags {
			array: get_tag(risk_array_section, "RA_TAG")?,
			r: get_tag(risk_array_section, "R_TAG")?,
			a: get_tag(risk_array_section, "A_TAG")?,
			d: get_tag(risk_array_section, "D_TAG")?
		};
		let config = TagConfig {
			blocks,
			root,
			contract,
			interest,
			option,
			risk_array
		};
		Ok(config)
	}

	// Stock SPAN vocabulary, identical to config/tags-config.ini
	pub fn standard() -> TagConfig {
		let tag = |x: &str| x.to_string();
		TagConfig {
			blocks: BlockTags {
				physical: tag("phyPf"),
				futures: tag("futPf"),
				option: tag("oofPf")
			},
			root: RootTags {
				pf_id: tag("pfId"),
				pf_code: tag("pfCode"),
				currency: tag("currency"),
				cvf: tag("cvf"),
				svf: tag("svf"),
				value_meth: tag("valueMeth"),
				price_meth: tag("priceMeth"),
				setl_meth: tag("setlMeth")
			},
			contract: ContractTags {
				physical: tag("phy"),
				futures: tag("fut"),
				contract_id: tag("cId"),
				expiry: tag("pe"),
				volatility: tag("v"),
				settle_date: tag("setlDate"),
				price_scan: tag("priceScan"),
				vol_scan: tag("volScan")
			},
			interest: InterestTags {
				rate: tag("intrRate"),
				value: tag("val")
			},
			option: OptionTags {
				series: tag("series"),
				option: tag("opt"),
				contract_id: tag("cId"),
				option_type: tag("o"),
				strike_price: tag("k"),
				option_value: tag("val")
			},
			risk_array: RiskArrayTags {
				array: tag("ra"),
				r: tag("r"),
				a: tag("a"),
				d: tag("d")
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use crate::new_ini;
	use super::*;

	const STANDARD_INI: &str = "
# Stock SPAN vocabulary
[blocks]
PHYPF_BLOCK_TAG=phyPf
FUTPF_BLOCK_TAG=futPf
OOPF_BLOCK_TAG=oofPf

[root]
PF_ID_TAG=pfId
PF_CODE_TAG=pfCode
CURRENCY_TAG=currency
CVF_TAG=cvf
SVF_TAG=svf
VALUE_METH_TAG=valueMeth
PRICE_METH_TAG=priceMeth
SETL_METH_TAG=setlMeth

[contract]
PHY_TAG=phy
FUT_TAG=fut
CONTRACT_ID_TAG=cId
EXPIRY_TAG=pe
VOLATILITY_TAG=v
SETTLE_DATE_TAG=setlDate
PRICE_SCAN_TAG=priceScan
VOL_SCAN_TAG=volScan

[interest]
INTR_RATE_TAG=intrRate
VALUE_TAG=val

[option]
SERIES_TAG=series
OPT_TAG=opt
OPT_CONTRACT_ID_TAG=cId
OPTION_TYPE_TAG=o
STRIKE_PRICE_TAG=k
OPTION_VALUE_TAG=val

[riskarray]
RA_TAG=ra
R_TAG=r
A_TAG=a
D_TAG=d
";

	fn read_ini(content: &str) -> Ini {
		let mut ini = new_ini();
		ini.read(content.to_string()).unwrap();
		ini
	}

	#[test]
	fn loads_standard_vocabulary() {
		let config = TagConfig::from_ini(&read_ini(STANDARD_INI)).unwrap();
		assert_eq!(config, TagConfig::standard());
	}

	#[test]
	fn later_duplicate_keys_overwrite() {
		let content = STANDARD_INI.replace("[interest]\n", "[interest]\nVALUE_TAG=rate\n");
		let config = TagConfig::from_ini(&read_ini(content.as_str())).unwrap();
		assert_eq!(config.interest.value, "val");
		let content = STANDARD_INI.replace("VALUE_TAG=val\n", "VALUE_TAG=val\nVALUE_TAG=rate\n");
		let config = TagConfig::from_ini(&read_ini(content.as_str())).unwrap();
		assert_eq!(config.interest.value, "rate");
	}

	#[test]
	fn missing_key_is_rejected() {
		let content = STANDARD_INI.replace("D_TAG=d\n", "");
		let error = TagConfig::from_ini(&read_ini(content.as_str())).unwrap_err();
		assert!(error.to_string().contains("D_TAG"));
		assert!(error.to_string().contains("riskarray"));
	}

	#[test]
	fn missing_section_is_rejected() {
		let content = STANDARD_INI.replace("[blocks]", "[unused]");
		assert!(TagConfig::from_ini(&read_ini(content.as_str())).is_err());
	}

	#[test]
	fn empty_and_malformed_values_are_rejected() {
		let content = STANDARD_INI.replace("R_TAG=r", "R_TAG=");
		assert!(TagConfig::from_ini(&read_ini(content.as_str())).is_err());
		let content = STANDARD_INI.replace("R_TAG=r", "R_TAG=<r>");
		let error = TagConfig::from_ini(&read_ini(content.as_str())).unwrap_err();
		assert!(error.to_string().contains("Invalid tag name"));
	}

	#[test]
	fn tag_values_keep_their_case() {
		let content = STANDARD_INI.replace("PHYPF_BLOCK_TAG=phyPf", "phypf_block_tag=PhysicalPortfolio");
		let config = TagConfig::from_ini(&read_ini(content.as_str())).unwrap();
		assert_eq!(config.blocks.physical, "PhysicalPortfolio");
	}
}
