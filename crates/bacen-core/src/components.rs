//! Static catalogs for report categories and chart components.
//!
//! The BACEN reports identify every measured quantity by a composite
//! category key (`report name ‖ group ‖ column name`). The dashboards address
//! those quantities through short labels. Both sides of that mapping are
//! fixed and finite, so they live here as closed enumerations:
//!
//! - [`ComponentGroup`] - waterfall chart component definitions, whose
//!   declared order drives aggregation output order
//! - [`MarketFeature`] - the market-metrics catalog
//! - [`CreditModality`] - the credit portfolio modality catalog
//!
//! An unrecognized label is a caller error
//! ([`BacenError::UnknownFeature`] and friends), never a silent miss.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BacenError;

/// Column label of the synthetic operating-revenue aggregate.
pub const OPERATING_REVENUE: &str = "Receita Operacional";

/// Column label of the active-clients count.
pub const ACTIVE_CLIENTS: &str = "Quantidade de clientes com operações ativas";

/// Sentinel group/account marker for rows derived at ETL time rather than
/// reported by the institution.
pub const CALCULATED: &str = "Calculated";

/// Column label of the synthetic return-on-assets ratio.
pub const ROA: &str = "ROA";

/// Column label of the synthetic return-on-equity ratio.
pub const ROE: &str = "ROE";

/// Resumo column label for net income.
pub const NET_INCOME: &str = "Lucro Líquido";

/// DRE column label for the net income line.
pub const NET_INCOME_LINE: &str = "Lucro Líquido \n(j) = (g) + (h) + (i)";

/// Resumo column label for total assets.
pub const TOTAL_ASSETS: &str = "Ativo Total";

/// Resumo column label for equity.
pub const EQUITY: &str = "Patrimônio Líquido";

/// The four income-statement components summed into `Receita Operacional`.
pub const OPERATING_REVENUE_PARTS: [&str; 4] = [
    "Receitas de Intermediação Financeira \n(a) = (a1) + (a2) + (a3) + (a4) + (a5) + (a6)",
    "Rendas de Prestação de Serviços \n(d1)",
    "Rendas de Tarifas Bancárias \n(d2)",
    "Outras Receitas Operacionais \n(d7)",
];

/// Label of the synthetic bucket summing minor intermediation revenue lines.
pub const OTHER_INTERMEDIATION_REVENUE: &str = "Outras Receitas Intermediação";

/// Members of the [`OTHER_INTERMEDIATION_REVENUE`] bucket. A member missing
/// from an institution's reported set contributes zero.
pub const OTHER_INTERMEDIATION_REVENUE_PARTS: [&str; 4] = [
    "Rendas de Operações de Arrendamento Mercantil \n(a2)",
    "Rendas de Operações com Instrumentos Financeiros Derivativos \n(a4)",
    "Resultado de Operações de Câmbio \n(a5)",
    "Rendas de Aplicações Compulsórias \n(a6)",
];

/// How a waterfall bar is rendered: a step relative to the running total, or
/// a standalone total bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Measure {
    /// Additive step in the waterfall.
    Relative,
    /// Standalone total bar.
    Total,
}

impl Measure {
    /// Returns the Plotly measure keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Relative => "relative",
            Self::Total => "total",
        }
    }
}

/// One component of a chart group: the raw column label it is sourced from,
/// the short display label, and its waterfall measure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentDef {
    /// Raw column label as reported (or synthesized) in the metrics table.
    pub source: &'static str,
    /// Short display label for chart axes and legends.
    pub display: &'static str,
    /// Waterfall measure kind.
    pub measure: Measure,
}

const fn comp(source: &'static str, display: &'static str, measure: Measure) -> ComponentDef {
    ComponentDef {
        source,
        display,
        measure,
    }
}

const REVENUE_BUILDUP: [ComponentDef; 7] = [
    comp(
        "Rendas de Operações de Crédito \n(a1)",
        "Receita de Crédito",
        Measure::Relative,
    ),
    comp(
        "Rendas de Operações com TVM \n(a3)",
        "Receita TVM",
        Measure::Relative,
    ),
    comp(
        OTHER_INTERMEDIATION_REVENUE,
        "Outras Rec. Intermediação",
        Measure::Relative,
    ),
    comp(
        "Rendas de Prestação de Serviços \n(d1)",
        "Receita Serviços",
        Measure::Relative,
    ),
    comp(
        "Rendas de Tarifas Bancárias \n(d2)",
        "Receita Tarifas",
        Measure::Relative,
    ),
    comp(
        "Outras Receitas Operacionais \n(d7)",
        "Outras Receitas Operacionais",
        Measure::Relative,
    ),
    comp(
        OPERATING_REVENUE,
        "Receita Operacional Total",
        Measure::Total,
    ),
];

const PL_DECOMPOSITION: [ComponentDef; 7] = [
    comp(OPERATING_REVENUE, "Receita Operacional", Measure::Relative),
    comp(
        "Despesas de Intermediação Financeira \n(b) = (b1) + (b2) + (b3) + (b4) + (b5)",
        "Despesas Intermediação",
        Measure::Relative,
    ),
    comp(
        "Despesas de Pessoal \n(d3)",
        "Despesas Pessoal",
        Measure::Relative,
    ),
    comp(
        "Despesas Administrativas \n(d4)",
        "Despesas Admin",
        Measure::Relative,
    ),
    comp(
        "Despesas Tributárias \n(d5)",
        "Despesas Tribut",
        Measure::Relative,
    ),
    comp(
        "Outras Despesas Operacionais \n(d8)",
        "Outras Despesas",
        Measure::Relative,
    ),
    comp(NET_INCOME_LINE, "Lucro Líquido", Measure::Total),
];

const INTERMEDIATION_BREAKDOWN: [ComponentDef; 7] = [
    comp(
        "Receitas de Intermediação Financeira \n(a) = (a1) + (a2) + (a3) + (a4) + (a5) + (a6)",
        "Receita Intermediação",
        Measure::Relative,
    ),
    comp(
        "Despesas de Captação \n(b1)",
        "Despesas Captação",
        Measure::Relative,
    ),
    comp(
        "Despesas de Obrigações por Empréstimos e Repasses \n(b2)",
        "Despesas Empréstimos",
        Measure::Relative,
    ),
    comp(
        "Despesas de Operações de Arrendamento Mercantil \n(b3)",
        "Despesas Arrend.",
        Measure::Relative,
    ),
    comp(
        "Resultado de Operações de Câmbio \n(b4)",
        "Resultado Câmbio",
        Measure::Relative,
    ),
    comp(
        "Resultado de Provisão para Créditos de Difícil Liquidação \n(b5)",
        "Provisão Créditos Difícil Liquidação",
        Measure::Relative,
    ),
    comp(
        "Resultado de Intermediação Financeira \n(c) = (a) + (b)",
        "Resultado Intermediação",
        Measure::Total,
    ),
];

const STORE_RECEITA_QTD_CLIENTES: [ComponentDef; 2] = [
    comp(OPERATING_REVENUE, "Receita Operacional", Measure::Total),
    comp(ACTIVE_CLIENTS, "Qtde. Clientes Ativos", Measure::Total),
];

/// A fixed group of chart components.
///
/// The declared component order is load-bearing: aggregation output and
/// waterfall rendering both follow it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentGroup {
    /// Revenue build-up waterfall.
    RevenueBuildup,
    /// P&L decomposition waterfall.
    PlDecomposition,
    /// Financial intermediation result breakdown.
    IntermediationBreakdown,
    /// Denominator store: operating revenue and active-client count, kept so
    /// weighted aggregations can recover selection-wide totals.
    StoreReceitaQtdClientes,
}

impl ComponentGroup {
    /// All component groups, in projection emission order.
    pub const ALL: [Self; 4] = [
        Self::RevenueBuildup,
        Self::PlDecomposition,
        Self::StoreReceitaQtdClientes,
        Self::IntermediationBreakdown,
    ];

    /// Returns the ordered component definitions of this group.
    #[must_use]
    pub const fn components(&self) -> &'static [ComponentDef] {
        match self {
            Self::RevenueBuildup => &REVENUE_BUILDUP,
            Self::PlDecomposition => &PL_DECOMPOSITION,
            Self::IntermediationBreakdown => &INTERMEDIATION_BREAKDOWN,
            Self::StoreReceitaQtdClientes => &STORE_RECEITA_QTD_CLIENTES,
        }
    }

    /// Looks up a component definition by its raw source label.
    #[must_use]
    pub fn component(&self, source: &str) -> Option<&'static ComponentDef> {
        self.components().iter().find(|c| c.source == source)
    }

    /// Returns the internal identifier used in the persisted tables.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RevenueBuildup => "revenue_buildup",
            Self::PlDecomposition => "pl_decomposition",
            Self::IntermediationBreakdown => "intermediation_breakdown",
            Self::StoreReceitaQtdClientes => "store_receita_qtd_clientes",
        }
    }

    /// Returns the Portuguese chart title for this group.
    #[must_use]
    pub const fn title_pt(&self) -> &'static str {
        match self {
            Self::RevenueBuildup => "Breakdown da Receita",
            Self::PlDecomposition => "Breakdown do P&L",
            Self::IntermediationBreakdown => {
                "Breakdown do Resultado de Intermediação Financeira"
            }
            Self::StoreReceitaQtdClientes => "store_receita_qtd_clientes",
        }
    }
}

impl FromStr for ComponentGroup {
    type Err = BacenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == s || g.title_pt() == s)
            .ok_or_else(|| BacenError::UnknownComponentGroup(s.to_string()))
    }
}

/// A market-metrics feature: a short dashboard label bound to the full
/// category key it selects in the cleaned ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketFeature {
    /// Count of clients with active credit operations.
    ActiveClients,
    /// Individual (PF) credit portfolio total.
    IndividualCreditPortfolio,
    /// Corporate (PJ) credit portfolio total.
    CorporateCreditPortfolio,
    /// Classified credit portfolio from the summary report.
    ClassifiedCreditPortfolio,
    /// Financial intermediation revenue.
    IntermediationRevenue,
    /// Service fee revenue.
    ServiceRevenue,
    /// Total funding.
    Funding,
    /// Net income.
    NetIncome,
    /// Total deposits on the liabilities side.
    TotalDeposits,
    /// Funding through issued securities (LCI, LCA, ...).
    IssuedSecurities,
    /// Revenue from credit operations.
    CreditOperationsRevenue,
    /// Revenue from securities operations.
    SecuritiesRevenue,
    /// Revenue from foreign-exchange operations.
    FxRevenue,
}

impl MarketFeature {
    /// All catalog features.
    pub const ALL: [Self; 13] = [
        Self::ActiveClients,
        Self::IndividualCreditPortfolio,
        Self::CorporateCreditPortfolio,
        Self::ClassifiedCreditPortfolio,
        Self::IntermediationRevenue,
        Self::ServiceRevenue,
        Self::Funding,
        Self::NetIncome,
        Self::TotalDeposits,
        Self::IssuedSecurities,
        Self::CreditOperationsRevenue,
        Self::SecuritiesRevenue,
        Self::FxRevenue,
    ];

    /// Returns the short dashboard label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ActiveClients => "Quantidade de clientes com operações ativas",
            Self::IndividualCreditPortfolio => "Carteira de Crédito Pessoa Física",
            Self::CorporateCreditPortfolio => "Carteira de Crédito Pessoa Jurídica",
            Self::ClassifiedCreditPortfolio => "Carteira de Crédito Classificada",
            Self::IntermediationRevenue => "Receitas de Intermediação Financeira",
            Self::ServiceRevenue => "Rendas de Prestação de Serviços",
            Self::Funding => "Captações",
            Self::NetIncome => "Lucro Líquido",
            Self::TotalDeposits => "Passivo Captacoes: Depósitos Total",
            Self::IssuedSecurities => "Passivo Captacoes: Emissão de Títulos (LCI,LCA,LCF...)",
            Self::CreditOperationsRevenue => "Receita com Operações de Crédito",
            Self::SecuritiesRevenue => "Receita com Operações de Títulos e Valores Mobiliários",
            Self::FxRevenue => "Receita com Operações de Câmbio",
        }
    }

    /// Returns the full category key this feature selects.
    #[must_use]
    pub const fn category_key(&self) -> &'static str {
        match self {
            Self::ActiveClients => {
                "Carteira de crédito ativa - quantidade de clientes e de operações_nagroup_Quantidade de clientes com operações ativas"
            }
            Self::IndividualCreditPortfolio => {
                "Carteira de crédito ativa Pessoa Física - modalidade e prazo de vencimento_nagroup_Total da Carteira de Pessoa Física"
            }
            Self::CorporateCreditPortfolio => {
                "Carteira de crédito ativa Pessoa Jurídica - por porte do tomador_nagroup_Total da Carteira de Pessoa Jurídica"
            }
            Self::ClassifiedCreditPortfolio => "Resumo_nagroup_Carteira de Crédito Classificada",
            Self::IntermediationRevenue => {
                "Demonstração de Resultado_Resultado de Intermediação Financeira - Receitas de Intermediação Financeira_Receitas de Intermediação Financeira \n(a) = (a1) + (a2) + (a3) + (a4) + (a5) + (a6)"
            }
            Self::ServiceRevenue => {
                "Demonstração de Resultado_Outras Receitas/Despesas Operacionais_Rendas de Prestação de Serviços \n(d1)"
            }
            Self::Funding => "Resumo_nagroup_Captações",
            Self::NetIncome => "Resumo_nagroup_Lucro Líquido",
            Self::TotalDeposits => "Passivo_Captações - Depósito Total_Depósito Total \n(a)",
            Self::IssuedSecurities => {
                "Passivo_Captações - Recursos de Aceites e Emissão de Títulos_Recursos de Aceites e Emissão de Títulos \n(c)"
            }
            Self::CreditOperationsRevenue => {
                "Demonstração de Resultado_Resultado de Intermediação Financeira - Receitas de Intermediação Financeira_Rendas de Operações de Crédito \n(a1)"
            }
            Self::SecuritiesRevenue => {
                "Demonstração de Resultado_Resultado de Intermediação Financeira - Receitas de Intermediação Financeira_Rendas de Operações com TVM \n(a3)"
            }
            Self::FxRevenue => {
                "Demonstração de Resultado_Resultado de Intermediação Financeira - Receitas de Intermediação Financeira_Resultado de Operações de Câmbio \n(a5)"
            }
        }
    }
}

impl FromStr for MarketFeature {
    type Err = BacenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.label() == s)
            .ok_or_else(|| BacenError::UnknownFeature(s.to_string()))
    }
}

const PF_PREFIX: &str =
    "Carteira de crédito ativa Pessoa Física - modalidade e prazo de vencimento";
const PJ_PREFIX: &str =
    "Carteira de crédito ativa Pessoa Jurídica - modalidade e prazo de vencimento";

/// A credit modality: a short dashboard label bound to the full category key
/// it selects in the combined credit table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum CreditModality {
    TotalPf,
    ConsignadoPf,
    NaoConsignadoPf,
    VeiculosPf,
    OutrosCreditosPf,
    HabitacaoPf,
    CartaoCreditoPf,
    RuralPf,
    TotalPj,
    RecebiveisPj,
    ComercioExteriorPj,
    OutrosCreditosPj,
    InfraestruturaPj,
    CapitalGiroPj,
    InvestimentoPj,
    CapitalGiroRotativoPj,
    RuralPj,
    HabitacaoPj,
    ChequeEspecialPj,
}

impl CreditModality {
    /// All catalog modalities.
    pub const ALL: [Self; 19] = [
        Self::TotalPf,
        Self::ConsignadoPf,
        Self::NaoConsignadoPf,
        Self::VeiculosPf,
        Self::OutrosCreditosPf,
        Self::HabitacaoPf,
        Self::CartaoCreditoPf,
        Self::RuralPf,
        Self::TotalPj,
        Self::RecebiveisPj,
        Self::ComercioExteriorPj,
        Self::OutrosCreditosPj,
        Self::InfraestruturaPj,
        Self::CapitalGiroPj,
        Self::InvestimentoPj,
        Self::CapitalGiroRotativoPj,
        Self::RuralPj,
        Self::HabitacaoPj,
        Self::ChequeEspecialPj,
    ];

    /// Detailed portfolio breakdown: every modality except the two totals.
    pub const PORTFOLIO_DETAILED: [Self; 17] = [
        Self::ConsignadoPf,
        Self::NaoConsignadoPf,
        Self::VeiculosPf,
        Self::OutrosCreditosPf,
        Self::HabitacaoPf,
        Self::CartaoCreditoPf,
        Self::RuralPf,
        Self::RecebiveisPj,
        Self::ComercioExteriorPj,
        Self::OutrosCreditosPj,
        Self::InfraestruturaPj,
        Self::CapitalGiroPj,
        Self::InvestimentoPj,
        Self::CapitalGiroRotativoPj,
        Self::RuralPj,
        Self::HabitacaoPj,
        Self::ChequeEspecialPj,
    ];

    /// Grouped portfolio breakdown: PF total vs PJ total.
    pub const PORTFOLIO_GROUPED: [Self; 2] = [Self::TotalPf, Self::TotalPj];

    /// Returns the short dashboard label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::TotalPf => "Total PF",
            Self::ConsignadoPf => "Consignado PF",
            Self::NaoConsignadoPf => "Não Consignado PF",
            Self::VeiculosPf => "Veículos PF",
            Self::OutrosCreditosPf => "Outros Créditos PF",
            Self::HabitacaoPf => "Habitação PF",
            Self::CartaoCreditoPf => "Cartão de Crédito PF",
            Self::RuralPf => "Rural PF",
            Self::TotalPj => "Total PJ",
            Self::RecebiveisPj => "Recebíveis PJ",
            Self::ComercioExteriorPj => "Comércio Exterior PJ",
            Self::OutrosCreditosPj => "Outros Créditos PJ",
            Self::InfraestruturaPj => "Infraestrutura PJ",
            Self::CapitalGiroPj => "Capital de Giro PJ",
            Self::InvestimentoPj => "Investimento PJ",
            Self::CapitalGiroRotativoPj => "Capital de Giro Rotativo PJ",
            Self::RuralPj => "Rural PJ",
            Self::HabitacaoPj => "Habitação PJ",
            Self::ChequeEspecialPj => "Cheque Especial PJ",
        }
    }

    /// Returns the full category key this modality selects.
    #[must_use]
    pub fn category_key(&self) -> String {
        match self {
            Self::TotalPf => format!("{PF_PREFIX}_nagroup_Total da Carteira de Pessoa Física"),
            Self::ConsignadoPf => format!("{PF_PREFIX}_Empréstimo com Consignação em Folha_Total"),
            Self::NaoConsignadoPf => {
                format!("{PF_PREFIX}_Empréstimo sem Consignação em Folha_Total")
            }
            Self::VeiculosPf => format!("{PF_PREFIX}_Veículos_Total"),
            Self::OutrosCreditosPf => format!("{PF_PREFIX}_Outros Créditos_Total"),
            Self::HabitacaoPf => format!("{PF_PREFIX}_Habitação_Total"),
            Self::CartaoCreditoPf => format!("{PF_PREFIX}_Cartão de Crédito_Total"),
            Self::RuralPf => format!("{PF_PREFIX}_Rural e Agroindustrial_Total"),
            Self::TotalPj => {
                "Carteira de crédito ativa Pessoa Jurídica - por porte do tomador_nagroup_Total da Carteira de Pessoa Jurídica"
                    .to_string()
            }
            Self::RecebiveisPj => format!("{PJ_PREFIX}_Operações com Recebíveis_Total"),
            Self::ComercioExteriorPj => format!("{PJ_PREFIX}_Comércio Exterior_Total"),
            Self::OutrosCreditosPj => format!("{PJ_PREFIX}_Outros Créditos_Total"),
            Self::InfraestruturaPj => format!(
                "{PJ_PREFIX}_Financiamento de Infraestrutura/Desenvolvimento/Projeto e Outros Créditos_Total"
            ),
            Self::CapitalGiroPj => format!("{PJ_PREFIX}_Capital de Giro_Total"),
            Self::InvestimentoPj => format!("{PJ_PREFIX}_Investimento_Total"),
            Self::CapitalGiroRotativoPj => format!("{PJ_PREFIX}_Capital de Giro Rotativo_Total"),
            Self::RuralPj => format!("{PJ_PREFIX}_Rural e Agroindustrial_Total"),
            Self::HabitacaoPj => format!("{PJ_PREFIX}_Habitacional_Total"),
            Self::ChequeEspecialPj => {
                format!("{PJ_PREFIX}_Cheque Especial e Conta Garantida_Total")
            }
        }
    }
}

impl FromStr for CreditModality {
    type Err = BacenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.label() == s)
            .ok_or_else(|| BacenError::UnknownModality(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_order_is_declared_order() {
        let sources: Vec<&str> = ComponentGroup::RevenueBuildup
            .components()
            .iter()
            .map(|c| c.source)
            .collect();
        assert_eq!(sources[0], "Rendas de Operações de Crédito \n(a1)");
        assert_eq!(sources[2], OTHER_INTERMEDIATION_REVENUE);
        assert_eq!(*sources.last().unwrap(), OPERATING_REVENUE);
        assert_eq!(
            ComponentGroup::RevenueBuildup.components().last().unwrap().measure,
            Measure::Total
        );
    }

    #[test]
    fn test_group_round_trip() {
        for group in ComponentGroup::ALL {
            assert_eq!(group.as_str().parse::<ComponentGroup>().unwrap(), group);
        }
        // Portuguese chart titles resolve too.
        assert_eq!(
            "Breakdown da Receita".parse::<ComponentGroup>().unwrap(),
            ComponentGroup::RevenueBuildup
        );
        assert!("pie_chart".parse::<ComponentGroup>().is_err());
    }

    #[test]
    fn test_market_feature_lookup() {
        let feature: MarketFeature = "Lucro Líquido".parse().unwrap();
        assert_eq!(feature, MarketFeature::NetIncome);
        assert_eq!(feature.category_key(), "Resumo_nagroup_Lucro Líquido");

        let err = "Lucro Bruto".parse::<MarketFeature>().unwrap_err();
        assert!(matches!(err, BacenError::UnknownFeature(_)));
    }

    #[test]
    fn test_modality_lookup() {
        let modality: CreditModality = "Veículos PF".parse().unwrap();
        assert_eq!(
            modality.category_key(),
            "Carteira de crédito ativa Pessoa Física - modalidade e prazo de vencimento_Veículos_Total"
        );
        assert!("Veículos XY".parse::<CreditModality>().is_err());
    }

    #[test]
    fn test_portfolio_views_exclude_or_keep_totals() {
        assert!(!CreditModality::PORTFOLIO_DETAILED.contains(&CreditModality::TotalPf));
        assert!(!CreditModality::PORTFOLIO_DETAILED.contains(&CreditModality::TotalPj));
        assert_eq!(
            CreditModality::PORTFOLIO_GROUPED,
            [CreditModality::TotalPf, CreditModality::TotalPj]
        );
    }

    #[test]
    fn test_store_group_holds_both_denominators() {
        let sources: Vec<&str> = ComponentGroup::StoreReceitaQtdClientes
            .components()
            .iter()
            .map(|c| c.source)
            .collect();
        assert_eq!(sources, vec![OPERATING_REVENUE, ACTIVE_CLIENTS]);
    }
}
