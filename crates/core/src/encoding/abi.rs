use alloy::dyn_abi::{DynSolType, DynSolValue, JsonAbiExt, Specifier};
use alloy::json_abi::{Function, JsonAbi, Param, StateMutability};
use alloy::primitives::{B256, Bytes, I256, Sign, U256};
use log::debug;
use std::collections::BTreeMap;

use crate::errors::EncodeError;
use crate::types::transaction_input::ValueType;
use crate::utils::parse::{parse_address, parse_hex_bytes, parse_uint};

/// Parses ABI text. Accepts a JSON ABI, a JSON array of human readable
/// signatures, or one human readable signature per line.
pub fn parse_abi(text: &str) -> Result<JsonAbi, EncodeError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(EncodeError::AbiParse("ABI is empty".to_string()));
    }

    if text.starts_with('[') {
        return match serde_json::from_str::<JsonAbi>(text) {
            Ok(abi) => Ok(abi),
            Err(json_err) => match serde_json::from_str::<Vec<String>>(text) {
                Ok(signatures) => parse_human_readable(signatures.iter().map(String::as_str)),
                Err(_) => Err(EncodeError::AbiParse(json_err.to_string())),
            },
        };
    }

    parse_human_readable(text.lines())
}

fn parse_human_readable<'a>(
    lines: impl Iterator<Item = &'a str>,
) -> Result<JsonAbi, EncodeError> {
    JsonAbi::parse(lines.map(str::trim).filter(|line| !line.is_empty()))
        .map_err(|e| EncodeError::AbiParse(e.to_string()))
}

/// Finds a function by canonical signature, e.g. `transfer(address,uint256)`.
/// A bare name is accepted when the function is not overloaded.
pub fn find_function<'a>(
    abi: &'a JsonAbi,
    signature: &str,
) -> Result<&'a Function, EncodeError> {
    let signature: String = signature.split_whitespace().collect();

    if let Some(function) = abi.functions().find(|f| f.signature() == signature) {
        return Ok(function);
    }

    match abi.function(&signature) {
        Some(overloads) if overloads.len() == 1 => Ok(&overloads[0]),
        _ => Err(EncodeError::FunctionNotFound(signature)),
    }
}

/// Functions a batch row can call: everything but `view` and `pure`.
pub fn writable_functions(abi: &JsonAbi) -> impl Iterator<Item = &Function> {
    abi.functions().filter(|f| is_writable(f))
}

fn is_writable(function: &Function) -> bool {
    !matches!(
        function.state_mutability,
        StateMutability::View | StateMutability::Pure
    )
}

/// Checks that `function` can be sent in a transaction carrying `value` wei.
pub fn check_callable(function: &Function, value: U256) -> Result<(), EncodeError> {
    if !is_writable(function) {
        return Err(EncodeError::encoding(format!(
            "`{}` is {}, it cannot be sent as a transaction",
            function.signature(),
            function.state_mutability.as_json_str()
        )));
    }
    if !value.is_zero() && function.state_mutability != StateMutability::Payable {
        return Err(EncodeError::encoding(format!(
            "`{}` is not payable, value must be 0, got {value}",
            function.signature()
        )));
    }
    Ok(())
}

/// ABI encodes a call to `signature`, taking each argument from
/// `input_values` by parameter name. Unnamed parameters are looked up by
/// their position (`"0"`, `"1"`, ...).
pub fn encode_function_call(
    abi: &str,
    signature: &str,
    input_values: &BTreeMap<String, ValueType>,
) -> Result<Bytes, EncodeError> {
    let abi = parse_abi(abi)?;
    let function = find_function(&abi, signature)?;
    encode_call(function, input_values)
}

/// Same as [`encode_function_call`] for an already resolved function.
pub fn encode_call(
    function: &Function,
    input_values: &BTreeMap<String, ValueType>,
) -> Result<Bytes, EncodeError> {
    let mut args = Vec::with_capacity(function.inputs.len());
    for (i, param) in function.inputs.iter().enumerate() {
        let key = if param.name.is_empty() {
            i.to_string()
        } else {
            param.name.clone()
        };

        let value = input_values
            .get(&key)
            .ok_or_else(|| EncodeError::MissingArgument {
                function: function.signature(),
                name: key.clone(),
            })?;

        let arg = coerce_param(value, param).map_err(|e| match e {
            EncodeError::Encoding(msg) => {
                EncodeError::Encoding(format!("parameter `{key}`: {msg}"))
            }
            other => other,
        })?;
        args.push(arg);
    }

    let data = function
        .abi_encode_input(&args)
        .map_err(|e| EncodeError::Encoding(e.to_string()))?;
    debug!("Encoded {} with {} argument(s)", function.signature(), args.len());

    Ok(Bytes::from(data))
}

/// Converts a user supplied value to the declared Solidity type of `param`.
pub fn coerce_param(value: &ValueType, param: &Param) -> Result<DynSolValue, EncodeError> {
    let ty: DynSolType = param
        .resolve()
        .map_err(|e| EncodeError::Encoding(format!("unsupported type `{}`: {e}", param.ty)))?;
    coerce(value, &ty, &param.components)
}

fn coerce(
    value: &ValueType,
    ty: &DynSolType,
    components: &[Param],
) -> Result<DynSolValue, EncodeError> {
    match (ty, value) {
        (DynSolType::Address, ValueType::String(s)) => Ok(DynSolValue::Address(parse_address(s)?)),

        (DynSolType::Bool, ValueType::Bool(b)) => Ok(DynSolValue::Bool(*b)),
        (DynSolType::Bool, ValueType::String(s)) => match s.trim() {
            "true" => Ok(DynSolValue::Bool(true)),
            "false" => Ok(DynSolValue::Bool(false)),
            other => Err(EncodeError::encoding(format!("invalid bool `{other}`"))),
        },

        (DynSolType::Uint(bits), ValueType::String(s)) => {
            let n = parse_uint(s)?;
            if n.bit_len() > *bits {
                return Err(EncodeError::encoding(format!("{n} does not fit in uint{bits}")));
            }
            Ok(DynSolValue::Uint(n, *bits))
        }
        (DynSolType::Int(bits), ValueType::String(s)) => {
            Ok(DynSolValue::Int(parse_int(s, *bits)?, *bits))
        }

        (DynSolType::Bytes, ValueType::String(s)) => {
            Ok(DynSolValue::Bytes(parse_hex_bytes(s)?.to_vec()))
        }
        (DynSolType::FixedBytes(size), ValueType::String(s)) => {
            let bytes = parse_hex_bytes(s)?;
            if bytes.len() != *size {
                return Err(EncodeError::encoding(format!(
                    "bytes{size} needs exactly {size} bytes, got {}",
                    bytes.len()
                )));
            }
            let mut word = B256::ZERO;
            word.0[..*size].copy_from_slice(&bytes);
            Ok(DynSolValue::FixedBytes(word, *size))
        }

        (DynSolType::String, ValueType::String(s)) => Ok(DynSolValue::String(s.clone())),

        (DynSolType::Array(inner), ValueType::Array(items)) => items
            .iter()
            .map(|item| coerce(item, inner, components))
            .collect::<Result<Vec<_>, _>>()
            .map(DynSolValue::Array),
        (DynSolType::FixedArray(inner, len), ValueType::Array(items)) => {
            if items.len() != *len {
                return Err(EncodeError::encoding(format!(
                    "expected {len} elements, got {}",
                    items.len()
                )));
            }
            items
                .iter()
                .map(|item| coerce(item, inner, components))
                .collect::<Result<Vec<_>, _>>()
                .map(DynSolValue::FixedArray)
        }

        (DynSolType::Tuple(types), ValueType::Array(items)) => {
            if items.len() != types.len() {
                return Err(EncodeError::encoding(format!(
                    "expected a tuple of {} elements, got {}",
                    types.len(),
                    items.len()
                )));
            }
            types
                .iter()
                .zip(items)
                .enumerate()
                .map(|(i, (ty, item))| coerce(item, ty, nested(components, i)))
                .collect::<Result<Vec<_>, _>>()
                .map(DynSolValue::Tuple)
        }
        (DynSolType::Tuple(types), ValueType::Map(fields)) => types
            .iter()
            .enumerate()
            .map(|(i, ty)| {
                let name = components
                    .get(i)
                    .map(|c| c.name.as_str())
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| {
                        EncodeError::encoding(format!(
                            "tuple component {i} has no name, pass an array"
                        ))
                    })?;
                let field = fields
                    .get(name)
                    .ok_or_else(|| EncodeError::encoding(format!("missing tuple field `{name}`")))?;
                coerce(field, ty, nested(components, i))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(DynSolValue::Tuple),

        (ty, value) => Err(EncodeError::encoding(format!(
            "cannot encode {} as {}",
            value.kind(),
            ty.sol_type_name()
        ))),
    }
}

fn nested(components: &[Param], i: usize) -> &[Param] {
    components.get(i).map(|c| c.components.as_slice()).unwrap_or(&[])
}

/// Parses a signed decimal or `0x` hex integer, range checked to `bits`.
fn parse_int(s: &str, bits: usize) -> Result<I256, EncodeError> {
    let s = s.trim();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (Sign::Negative, rest),
        None => (Sign::Positive, s),
    };
    let abs = parse_uint(digits)?;

    // 2^(bits - 1)
    let limit = U256::from(1) << (bits - 1);
    let in_range = match sign {
        Sign::Negative => abs <= limit,
        Sign::Positive => abs < limit,
    };
    if !in_range {
        return Err(EncodeError::encoding(format!("{s} does not fit in int{bits}")));
    }

    I256::checked_from_sign_and_abs(sign, abs)
        .ok_or_else(|| EncodeError::encoding(format!("{s} does not fit in int{bits}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ERC20_ABI: &str = r#"[
        {
            "type": "function",
            "name": "transfer",
            "stateMutability": "nonpayable",
            "inputs": [
                { "name": "to", "type": "address" },
                { "name": "amount", "type": "uint256" }
            ],
            "outputs": [{ "name": "", "type": "bool" }]
        },
        {
            "type": "function",
            "name": "approve",
            "stateMutability": "nonpayable",
            "inputs": [
                { "name": "spender", "type": "address" },
                { "name": "amount", "type": "uint256" }
            ],
            "outputs": [{ "name": "", "type": "bool" }]
        },
        {
            "type": "function",
            "name": "approve",
            "stateMutability": "nonpayable",
            "inputs": [
                { "name": "spender", "type": "address" },
                { "name": "enabled", "type": "bool" }
            ],
            "outputs": []
        }
    ]"#;

    fn values(pairs: &[(&str, ValueType)]) -> BTreeMap<String, ValueType> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn hex_of(data: &Bytes) -> String {
        hex::encode(data)
    }

    #[test]
    fn test_parse_abi_formats() {
        let json = parse_abi(ERC20_ABI).unwrap();
        assert_eq!(json.functions().count(), 3);

        let lines = parse_abi(
            "function transfer(address to, uint256 amount) returns (bool)\n\nfunction decimals() view returns (uint8)",
        )
        .unwrap();
        assert_eq!(lines.functions().count(), 2);

        let array = parse_abi(r#"["function multiSend(bytes memory transactions)"]"#).unwrap();
        assert!(array.function("multiSend").is_some());
    }

    #[test]
    fn test_parse_abi_rejects_garbage() {
        assert!(matches!(parse_abi(""), Err(EncodeError::AbiParse(_))));
        assert!(matches!(parse_abi("[{\"type\": "), Err(EncodeError::AbiParse(_))));
        assert!(matches!(parse_abi("not an abi"), Err(EncodeError::AbiParse(_))));
    }

    #[test]
    fn test_writable_functions_skip_view_and_pure() {
        let abi = parse_abi(
            "function transfer(address to, uint256 amount) returns (bool)\n\
             function decimals() view returns (uint8)\n\
             function version() pure returns (string)\n\
             function deposit() payable",
        )
        .unwrap();

        let names: Vec<_> = writable_functions(&abi).map(|f| f.name.as_str()).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"transfer"));
        assert!(names.contains(&"deposit"));
    }

    #[test]
    fn test_check_callable() {
        let abi = parse_abi(
            "function pause()\nfunction deposit() payable\nfunction decimals() view returns (uint8)",
        )
        .unwrap();
        let pause = find_function(&abi, "pause()").unwrap();
        let deposit = find_function(&abi, "deposit()").unwrap();
        let decimals = find_function(&abi, "decimals()").unwrap();

        assert!(check_callable(pause, U256::ZERO).is_ok());
        assert!(check_callable(pause, U256::from(1)).is_err());
        assert!(check_callable(deposit, U256::from(1)).is_ok());
        assert!(check_callable(decimals, U256::ZERO).is_err());
    }

    #[test]
    fn test_find_function() {
        let abi = parse_abi(ERC20_ABI).unwrap();

        assert_eq!(find_function(&abi, "transfer").unwrap().name, "transfer");
        assert_eq!(
            find_function(&abi, "approve(address, bool)")
                .unwrap()
                .signature(),
            "approve(address,bool)"
        );
        // overloaded, the bare name is ambiguous
        assert_eq!(
            find_function(&abi, "approve").unwrap_err(),
            EncodeError::FunctionNotFound("approve".to_string())
        );
        assert!(matches!(
            find_function(&abi, "mint(address,uint256)"),
            Err(EncodeError::FunctionNotFound(_))
        ));
    }

    #[test]
    fn test_encode_erc20_transfer() {
        let data = encode_function_call(
            ERC20_ABI,
            "transfer(address,uint256)",
            &values(&[
                ("to", "0x4444444444444444444444444444444444444444".into()),
                ("amount", "1000".into()),
            ]),
        )
        .unwrap();

        assert_eq!(
            hex_of(&data),
            concat!(
                "a9059cbb",
                "0000000000000000000000004444444444444444444444444444444444444444",
                "00000000000000000000000000000000000000000000000000000000000003e8"
            )
        );
    }

    #[test]
    fn test_encode_small_ints_and_bool() {
        let data = encode_function_call(
            "function setValues(uint8 small, int16 signed, bool flag)",
            "setValues(uint8,int16,bool)",
            &values(&[
                ("small", "255".into()),
                ("signed", "-2".into()),
                ("flag", "true".into()),
            ]),
        )
        .unwrap();

        assert_eq!(
            hex_of(&data),
            concat!(
                "9cf79d12",
                "00000000000000000000000000000000000000000000000000000000000000ff",
                "fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffe",
                "0000000000000000000000000000000000000000000000000000000000000001"
            )
        );
    }

    #[test]
    fn test_encode_bool_array() {
        let data = encode_function_call(
            "function setFlags(bool[] flags)",
            "setFlags(bool[])",
            &values(&[(
                "flags",
                ValueType::Array(vec![ValueType::Bool(true), "false".into()]),
            )]),
        )
        .unwrap();

        assert_eq!(
            hex_of(&data),
            concat!(
                "da46ec33",
                "0000000000000000000000000000000000000000000000000000000000000020",
                "0000000000000000000000000000000000000000000000000000000000000002",
                "0000000000000000000000000000000000000000000000000000000000000001",
                "0000000000000000000000000000000000000000000000000000000000000000"
            )
        );
    }

    #[test]
    fn test_encode_tuple_from_map_or_array() {
        let abi = r#"[{
            "type": "function",
            "name": "configure",
            "stateMutability": "nonpayable",
            "inputs": [{
                "name": "config",
                "type": "tuple",
                "components": [
                    { "name": "owner", "type": "address" },
                    { "name": "limit", "type": "uint256" }
                ]
            }],
            "outputs": []
        }]"#;
        let expected = concat!(
            "3cac8fee",
            "0000000000000000000000001111111111111111111111111111111111111111",
            "0000000000000000000000000000000000000000000000000000000000000005"
        );

        let mut fields = BTreeMap::new();
        fields.insert(
            "owner".to_string(),
            ValueType::from("0x1111111111111111111111111111111111111111"),
        );
        fields.insert("limit".to_string(), ValueType::from("5"));

        let from_map = encode_function_call(
            abi,
            "configure",
            &values(&[("config", ValueType::Map(fields))]),
        )
        .unwrap();
        assert_eq!(hex_of(&from_map), expected);

        let from_array = encode_function_call(
            abi,
            "configure",
            &values(&[(
                "config",
                vec!["0x1111111111111111111111111111111111111111", "5"].into(),
            )]),
        )
        .unwrap();
        assert_eq!(from_array, from_map);
    }

    #[test]
    fn test_unnamed_params_by_position() {
        let data = encode_function_call(
            "function setHash(bytes32)",
            "setHash(bytes32)",
            &values(&[(
                "0",
                "0x85a1d638adb1d66ab2fd111cc71199c952980658e19ee82b06d76cf42b341b74".into(),
            )]),
        )
        .unwrap();

        assert_eq!(
            hex_of(&data),
            "0c4c428585a1d638adb1d66ab2fd111cc71199c952980658e19ee82b06d76cf42b341b74"
        );
    }

    #[test]
    fn test_missing_argument() {
        let err = encode_function_call(
            ERC20_ABI,
            "transfer(address,uint256)",
            &values(&[("to", "0x4444444444444444444444444444444444444444".into())]),
        )
        .unwrap_err();

        assert_eq!(
            err,
            EncodeError::MissingArgument {
                function: "transfer(address,uint256)".to_string(),
                name: "amount".to_string(),
            }
        );
    }

    #[test]
    fn test_type_mismatches() {
        let cases: Vec<(&str, &str, ValueType)> = vec![
            ("function f(uint8 a)", "f", "256".into()),
            ("function f(uint256 a)", "f", "12abc".into()),
            ("function f(int8 a)", "f", "-129".into()),
            ("function f(int8 a)", "f", "128".into()),
            ("function f(address a)", "f", "0x1234".into()),
            ("function f(bool a)", "f", "yes".into()),
            ("function f(bytes32 a)", "f", "0xdeadbeef".into()),
            ("function f(uint256[2] a)", "f", vec!["1"].into()),
            ("function f(string a)", "f", ValueType::Bool(true)),
            ("function f(uint256[] a)", "f", "1".into()),
        ];

        for (abi, signature, value) in cases {
            let err = encode_function_call(abi, signature, &values(&[("a", value.clone())]))
                .unwrap_err();
            assert!(
                matches!(err, EncodeError::Encoding(_)),
                "{abi} with {value:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_int_bounds() {
        assert_eq!(parse_int("-128", 8).unwrap(), I256::try_from(-128i64).unwrap());
        assert_eq!(parse_int("127", 8).unwrap(), I256::try_from(127i64).unwrap());
        assert!(parse_int("-129", 8).is_err());
        assert!(parse_int("128", 8).is_err());
        assert_eq!(parse_int("-0x10", 256).unwrap(), I256::try_from(-16i64).unwrap());
    }
}
