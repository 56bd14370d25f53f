//! Call tracer output and its flattened form.
use alloy_primitives::Address;
use alloy_primitives::Bytes;
use alloy_primitives::U256;
use serde::Deserialize;
use serde::Serialize;

use super::types::OperationType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallType {
    #[serde(rename = "CALL")]
    Call,
    #[serde(rename = "CALLCODE")]
    CallCode,
    #[serde(rename = "DELEGATECALL")]
    DelegateCall,
    #[serde(rename = "STATICCALL")]
    StaticCall,
    #[serde(rename = "CREATE")]
    Create,
    #[serde(rename = "CREATE2")]
    Create2,
    #[serde(rename = "SELFDESTRUCT")]
    SelfDestruct,
}

impl CallType {
    /// Plain value transfer kinds, as opposed to account creation or destruction.
    pub fn is_call(&self) -> bool {
        matches!(
            self,
            Self::Call | Self::CallCode | Self::DelegateCall | Self::StaticCall
        )
    }

    pub fn is_create(&self) -> bool {
        matches!(self, Self::Create | Self::Create2)
    }
}

impl From<CallType> for OperationType {
    fn from(call_type: CallType) -> Self {
        match call_type {
            CallType::Call => Self::Call,
            CallType::CallCode => Self::CallCode,
            CallType::DelegateCall => Self::DelegateCall,
            CallType::StaticCall => Self::StaticCall,
            CallType::Create => Self::Create,
            CallType::Create2 => Self::Create2,
            CallType::SelfDestruct => Self::SelfDestruct,
        }
    }
}

/// A node of the call tracer output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    #[serde(rename = "type")]
    pub call_type: CallType,
    pub from: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Bytes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Bytes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revert_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub calls: Vec<Call>,
}

/// A single call of a flattened trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatCall {
    #[serde(rename = "type")]
    pub call_type: CallType,
    pub from: Address,
    pub to: Option<Address>,
    pub value: U256,
    /// Revert reason, set when the call (or one of its ancestors) reverted.
    pub error: Option<String>,
}

impl FlatCall {
    pub fn new(call_type: CallType, from: Address, to: Address, value: U256) -> Self {
        Self {
            call_type,
            from,
            to: Some(to),
            value,
            error: None,
        }
    }

    pub fn reverted(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_owned());
        self
    }

    pub fn is_reverted(&self) -> bool {
        self.error.is_some()
    }
}

impl Call {
    pub fn new(call_type: CallType, from: Address, to: Option<Address>) -> Self {
        Self {
            call_type,
            from,
            to,
            value: None,
            gas: None,
            gas_used: None,
            input: None,
            output: None,
            error: None,
            revert_reason: None,
            calls: vec![],
        }
    }

    pub fn value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    pub fn error(mut self, error: &str) -> Self {
        self.error = Some(error.to_owned());
        self
    }

    pub fn add_call(mut self, call: Call) -> Self {
        self.calls.push(call);
        self
    }

    /// Flattens the call tree in execution (pre-)order.
    ///
    /// Descendants of a reverted call are reverted too and inherit
    /// its error message unless they carry their own.
    pub fn flatten(&self) -> Vec<FlatCall> {
        let mut flat = vec![];
        self.flatten_into(None, &mut flat);
        flat
    }

    fn flatten_into(&self, inherited: Option<&str>, flat: &mut Vec<FlatCall>) {
        let own = self.error.as_deref().filter(|e| !e.is_empty());
        let error = match (own, inherited) {
            (Some(e), _) => Some(e),
            (None, parent) => parent,
        };
        flat.push(FlatCall {
            call_type: self.call_type,
            from: self.from,
            to: self.to,
            value: self.value.unwrap_or(U256::ZERO),
            error: error.map(str::to_owned),
        });
        for child in &self.calls {
            child.flatten_into(error, flat);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flatten_order() {
        let a = Address::repeat_byte(0x0a);
        let b = Address::repeat_byte(0x0b);
        let c = Address::repeat_byte(0x0c);
        let trace = Call::new(CallType::Call, a, Some(b))
            .value(U256::from(100))
            .add_call(
                Call::new(CallType::Create, b, Some(c))
                    .add_call(Call::new(CallType::SelfDestruct, c, Some(a))),
            )
            .add_call(Call::new(CallType::StaticCall, b, Some(a)));
        let flat = trace.flatten();
        let kinds: Vec<CallType> = flat.iter().map(|c| c.call_type).collect();
        assert_eq!(
            kinds,
            vec![
                CallType::Call,
                CallType::Create,
                CallType::SelfDestruct,
                CallType::StaticCall
            ]
        );
        assert_eq!(flat[0].value, U256::from(100));
        // Missing values are zero
        assert_eq!(flat[1].value, U256::ZERO);
        assert!(flat.iter().all(|c| !c.is_reverted()));
    }

    #[test]
    fn test_revert_propagates_to_descendants() {
        let a = Address::repeat_byte(0x0a);
        let b = Address::repeat_byte(0x0b);
        let trace = Call::new(CallType::Call, a, Some(b)).add_call(
            Call::new(CallType::Call, b, Some(a))
                .error("execution reverted")
                .add_call(Call::new(CallType::Call, a, Some(b)))
                .add_call(Call::new(CallType::Call, a, Some(b)).error("out of gas")),
        );
        let flat = trace.flatten();
        assert_eq!(flat.len(), 4);
        assert_eq!(flat[0].error, None);
        assert_eq!(flat[1].error.as_deref(), Some("execution reverted"));
        assert_eq!(flat[2].error.as_deref(), Some("execution reverted"));
        assert_eq!(flat[3].error.as_deref(), Some("out of gas"));
    }

    #[test]
    fn test_deserialize_tracer_output() {
        let json = r#"{
            "type": "CALL",
            "from": "0x0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a",
            "to": "0x0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b",
            "value": "0x64",
            "gas": "0x5208",
            "gasUsed": "0x5208",
            "input": "0x",
            "calls": [{
                "type": "SELFDESTRUCT",
                "from": "0x0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b",
                "to": "0x0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a"
            }]
        }"#;
        let trace: Call = serde_json::from_str(json).unwrap();
        assert_eq!(trace.value, Some(U256::from(100)));
        assert_eq!(trace.calls.len(), 1);
        assert_eq!(trace.calls[0].call_type, CallType::SelfDestruct);
        assert_eq!(trace.calls[0].value, None);
    }
}
